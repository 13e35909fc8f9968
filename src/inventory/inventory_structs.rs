// src/inventory/inventory_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::{PosError, PosResult};
use crate::shared::shared_utils::{amount_as_number, null_as_default, round_money, validate_amount};

/// Estrutura que representa um item do catálogo, com preço e estoque atual.
/// Sai no JSON como `pid`, o nome usado pelo frontend; `id` e `desc` também são aceitos na entrada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "pid", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "desc", deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(serialize_with = "amount_as_number")]
    pub price: BigDecimal,
    #[serde(default)]
    pub quantity: i64,
}

impl Item {
    /// Chave usada na unicidade dos nomes, sem diferenciar maiúsculas.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Estrutura para receber os dados do novo item na requisição POST
#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub quantity: i64,
}

impl NewItem {
    pub fn validate(&self) -> PosResult<()> {
        if self.name.trim().is_empty() {
            return Err(PosError::InvalidInput("item name must not be empty".into()));
        }
        validate_amount("price", &self.price)?;
        validate_quantity(self.quantity)
    }
}

/// Corpo do PUT que altera um item. Só os campos presentes são aplicados.
#[derive(Debug, Default, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<BigDecimal>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl ItemUpdate {
    pub fn validate(&self) -> PosResult<()> {
        if let Some(price) = &self.price {
            validate_amount("price", price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(())
    }

    /// Aplica os campos presentes em `item`; os demais ficam como estão.
    /// Preços são guardados em centavos.
    pub fn apply_to(self, item: &mut Item) {
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(price) = self.price {
            item.price = round_money(&price);
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
    }
}

fn validate_quantity(quantity: i64) -> PosResult<()> {
    if quantity < 0 {
        return Err(PosError::InvalidInput(format!("quantity must not be negative (got {quantity})")));
    }
    Ok(())
}
