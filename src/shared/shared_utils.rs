// src/shared/shared_utils.rs

use bigdecimal::{BigDecimal, Signed};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use uuid::Uuid;

use crate::error::{PosError, PosResult};

/// Tamanho dos IDs opacos gerados para itens e notas.
pub const SHORT_ID_LEN: usize = 8;

/// Maior valor aceito num campo monetário, exclusivo.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;
/// Máximo de casas decimais aceitas num valor vindo do cliente.
/// Floats do JavaScript como `29.970000000000002` cabem com folga.
pub const MAX_AMOUNT_SCALE: i64 = 20;
// Limite em bits do inteiro sem escala; 10^12 com 20 casas cabe em 107 bits
const MAX_AMOUNT_BITS: u64 = 128;

/// Gera um token opaco de 8 caracteres (prefixo de um UUID v4 aleatório).
pub fn new_short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

/// Arredonda um valor monetário para centavos, com escala fixa de dois dígitos.
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.round(2).with_scale(2)
}

/// Valida um valor monetário recebido: não negativo, menor que `MAX_AMOUNT`
/// e com no máximo `MAX_AMOUNT_SCALE` casas decimais.
///
/// Expoente e escala são conferidos antes de qualquer comparação ou
/// formatação, então `1E+2000000` é recusado sem expandir seus dígitos.
pub fn validate_amount(field: &str, amount: &BigDecimal) -> PosResult<()> {
    let (digits, scale) = amount.as_bigint_and_exponent();
    let out_of_range = scale > MAX_AMOUNT_SCALE
        || scale < -12
        || digits.bits() > MAX_AMOUNT_BITS
        || amount.abs() >= BigDecimal::from(MAX_AMOUNT);
    if out_of_range {
        return Err(PosError::InvalidInput(format!(
            "{field} must be below {MAX_AMOUNT} with at most {MAX_AMOUNT_SCALE} decimal places"
        )));
    }
    if amount.is_negative() {
        return Err(PosError::InvalidInput(format!(
            "{field} must not be negative (got {amount})"
        )));
    }
    Ok(())
}

/// Serializa um valor monetário como número JSON, arredondado para centavos.
pub fn amount_as_number<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let cents = round_money(amount).to_string();
    let value: f64 = cents.parse().map_err(S::Error::custom)?;
    serializer.serialize_f64(value)
}

/// Desserializa `null` como o valor padrão do tipo.
/// Documentos do antigo armazenamento em arquivos às vezes trazem `null` onde se espera uma string.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
