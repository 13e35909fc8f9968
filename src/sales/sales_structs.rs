// src/sales/sales_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::shared::shared_utils::{amount_as_number, null_as_default};

/// Um registro do log de produtos vendidos, gravado uma vez por linha do checkout.
/// O horário fica como texto: registros importados de documentos antigos
/// podem trazer valores que não são datas, e a análise os ignora.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldRecord {
    #[serde(rename = "pid", alias = "item_id")]
    pub item_id: String,
    #[serde(default = "unknown_product")]
    pub product: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub timestamp: String,
}

fn unknown_product() -> String {
    "Unknown".to_string()
}

/// Corpo da requisição de adicionar à sacola.
#[derive(Debug, Deserialize)]
pub struct CartRequest {
    #[serde(rename = "pid", alias = "id")]
    pub id: String,
    #[serde(default = "default_cart_quantity")]
    pub quantity: i64,
}

fn default_cart_quantity() -> i64 {
    1
}

/// Uma quantidade pedida de um item, já com preço.
/// Campos extras enviados pelo cliente (como o preço unitário) são ignorados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "pid", alias = "id")]
    pub id: String,
    pub name: String,
    pub quantity: i64,
    #[serde(serialize_with = "amount_as_number")]
    pub subtotal: BigDecimal,
}

/// Corpo da requisição de checkout.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(default)]
    pub cart_items: Vec<CartLine>,
}
