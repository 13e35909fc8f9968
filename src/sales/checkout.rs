// src/sales/checkout.rs

use chrono::NaiveDateTime;
use sqlx::{Pool, Sqlite};

use super::sales_repository;
use super::sales_structs::{CheckoutRequest, SoldRecord};
use crate::billing::billing_repository;
use crate::billing::billing_structs::{Invoice, InvoiceLine};
use crate::error::{PosError, PosResult};
use crate::inventory::inventory_repository;
use crate::shared::shared_utils::{new_short_id, validate_amount};

/// Formato da data da nota mostrada ao cliente.
pub const INVOICE_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
/// Formato do horário dos registros de venda (ISO 8601, hora local, microssegundos).
pub const SOLD_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Transforma uma sacola em nota.
///
/// Passos:
/// 1. Recusa sacola vazia ou linhas malformadas antes de tocar no banco.
/// 2. Abre uma transação no pool de escrita e reserva um ID de nota novo.
/// 3. Para cada linha, decrementa o estoque e grava um registro de venda.
/// 4. Calcula os totais e acrescenta a nota ao histórico.
/// 5. Comita a transação.
///
/// Se alguma linha falhar (item desconhecido, estoque insuficiente) a
/// transação é descartada e desfeita: nenhum estoque, registro de venda ou
/// nota é mantido. Checkouts simultâneos fazem fila pela única conexão de
/// `writer`. A imagem da nota fica por conta de quem chama.
pub async fn checkout(
    writer: &Pool<Sqlite>,
    request: CheckoutRequest,
    now: NaiveDateTime,
) -> PosResult<Invoice> {
    let CheckoutRequest {
        payment_method,
        cart_items,
    } = request;

    if cart_items.is_empty() {
        return Err(PosError::EmptyCart);
    }
    for line in &cart_items {
        if line.quantity <= 0 {
            return Err(PosError::InvalidInput(format!(
                "quantity for {} must be positive (got {})",
                line.name, line.quantity
            )));
        }
        validate_amount(&format!("subtotal for {}", line.name), &line.subtotal)?;
    }

    let timestamp = now.format(SOLD_TIMESTAMP_FORMAT).to_string();
    let date = now.format(INVOICE_DATE_FORMAT).to_string();

    let mut transaction = writer.begin().await?;

    let mut invoice_id = new_short_id();
    while billing_repository::invoice_id_taken(&mut transaction, &invoice_id).await? {
        invoice_id = new_short_id();
    }

    for line in &cart_items {
        inventory_repository::decrease_stock(&mut transaction, &line.id, line.quantity).await?;

        let record = SoldRecord {
            item_id: line.id.clone(),
            product: line.name.clone(),
            quantity: line.quantity,
            timestamp: timestamp.clone(),
        };
        sales_repository::log_sold_product(&mut transaction, &record).await?;
    }

    let lines = cart_items.into_iter().map(InvoiceLine::from).collect();
    let invoice = Invoice::new(invoice_id, date, payment_method, lines);
    billing_repository::append_invoice(&mut transaction, &invoice).await?;

    transaction.commit().await?;

    tracing::info!(
        invoice_id = %invoice.invoice_id,
        lines = invoice.items.len(),
        total = %invoice.total,
        "checkout completed"
    );
    Ok(invoice)
}
