// src/sales/cart.rs

use bigdecimal::BigDecimal;

use super::sales_structs::CartLine;
use crate::error::{PosError, PosResult};
use crate::inventory::inventory_structs::Item;

/// Calcula o preço de `quantity` unidades de `item` para a sacola.
///
/// Cálculo puro: o estoque só é conferido, nunca reservado.
pub fn price_cart_line(item: &Item, quantity: i64) -> PosResult<CartLine> {
    if quantity <= 0 {
        return Err(PosError::InvalidInput(format!(
            "cart quantity must be positive (got {quantity})"
        )));
    }
    if item.quantity < quantity {
        return Err(PosError::InsufficientStock {
            id: item.id.clone(),
            requested: quantity,
            available: item.quantity,
        });
    }

    Ok(CartLine {
        id: item.id.clone(),
        name: item.name.clone(),
        quantity,
        subtotal: &item.price * &BigDecimal::from(quantity),
    })
}
