// src/billing/billing_structs.rs

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::sales::sales_structs::CartLine;
use crate::shared::shared_utils::{amount_as_number, null_as_default, round_money};

/// GST cobrado sobre o subtotal da nota, em porcento.
pub const GST_PERCENT: u32 = 18;
/// Imposto adicional cobrado sobre o subtotal da nota, em porcento.
pub const ADDITIONAL_TAX_PERCENT: u32 = 2;

/// Uma linha da nota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    #[serde(rename = "pid", alias = "id")]
    pub id: String,
    pub name: String,
    pub quantity: i64,
    #[serde(serialize_with = "amount_as_number")]
    pub subtotal: BigDecimal,
}

impl From<CartLine> for InvoiceLine {
    fn from(line: CartLine) -> Self {
        InvoiceLine {
            id: line.id,
            name: line.name,
            quantity: line.quantity,
            subtotal: round_money(&line.subtotal),
        }
    }
}

/// Valores da nota, todos arredondados para centavos.
/// `total` é exatamente `subtotal + gst + additional_tax - discount`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: BigDecimal,
    pub gst: BigDecimal,
    pub additional_tax: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
}

impl InvoiceTotals {
    pub fn from_lines(lines: &[InvoiceLine]) -> Self {
        let subtotal = round_money(
            &lines
                .iter()
                .fold(BigDecimal::zero(), |sum, line| sum + &line.subtotal),
        );
        let gst = round_money(&percent_of(&subtotal, GST_PERCENT));
        let additional_tax = round_money(&percent_of(&subtotal, ADDITIONAL_TAX_PERCENT));
        let discount = round_money(&BigDecimal::zero());
        let total = &subtotal + &gst + &additional_tax - &discount;

        InvoiceTotals {
            subtotal,
            gst,
            additional_tax,
            discount,
            total,
        }
    }
}

fn percent_of(amount: &BigDecimal, percent: u32) -> BigDecimal {
    (amount * &BigDecimal::from(percent)) / BigDecimal::from(100)
}

/// O registro imutável de uma venda concluída, como fica no histórico.
/// Os valores saem no JSON como números, como o frontend espera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(default)]
    pub items: Vec<InvoiceLine>,
    #[serde(serialize_with = "amount_as_number")]
    pub subtotal: BigDecimal,
    #[serde(serialize_with = "amount_as_number")]
    pub gst: BigDecimal,
    #[serde(serialize_with = "amount_as_number")]
    pub additional_tax: BigDecimal,
    #[serde(serialize_with = "amount_as_number")]
    pub discount: BigDecimal,
    #[serde(serialize_with = "amount_as_number")]
    pub total: BigDecimal,
}

impl Invoice {
    /// Monta a nota a partir das linhas, calculando todos os valores.
    pub fn new(
        invoice_id: String,
        date: String,
        payment_method: String,
        items: Vec<InvoiceLine>,
    ) -> Self {
        let InvoiceTotals {
            subtotal,
            gst,
            additional_tax,
            discount,
            total,
        } = InvoiceTotals::from_lines(&items);

        Invoice {
            invoice_id,
            date,
            payment_method,
            items,
            subtotal,
            gst,
            additional_tax,
            discount,
            total,
        }
    }
}
