// src/billing/billing_repository.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};
use std::str::FromStr;

use super::billing_structs::{Invoice, InvoiceLine};
use crate::error::{PosError, PosResult};

/// Linha da tabela `invoices`. As linhas da nota ficam num array JSON,
/// os valores como texto decimal.
#[derive(FromRow)]
struct InvoiceRow {
    invoice_id: String,
    date: String,
    payment_method: String,
    items: String,
    subtotal: String,
    gst: String,
    additional_tax: String,
    discount: String,
    total: String,
}

fn parse_money(invoice_id: &str, field: &str, value: &str) -> PosResult<BigDecimal> {
    BigDecimal::from_str(value).map_err(|_| {
        PosError::CorruptRecord(format!("invoice {invoice_id} has {field} '{value}'"))
    })
}

/// Linha da nota como fica na coluna `items`. O subtotal é texto decimal
/// exato, não o número arredondado que vai para os clientes.
#[derive(Serialize, Deserialize)]
struct StoredLine {
    #[serde(alias = "id")]
    pid: String,
    name: String,
    quantity: i64,
    subtotal: String,
}

impl From<&InvoiceLine> for StoredLine {
    fn from(line: &InvoiceLine) -> Self {
        StoredLine {
            pid: line.id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal.to_string(),
        }
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = PosError;

    fn try_from(row: InvoiceRow) -> PosResult<Self> {
        let id = row.invoice_id.as_str();
        let stored: Vec<StoredLine> = serde_json::from_str(&row.items).map_err(|e| {
            PosError::CorruptRecord(format!("invoice {id} has unreadable lines: {e}"))
        })?;
        let items = stored
            .into_iter()
            .map(|line| {
                Ok(InvoiceLine {
                    subtotal: parse_money(id, "line subtotal", &line.subtotal)?,
                    id: line.pid,
                    name: line.name,
                    quantity: line.quantity,
                })
            })
            .collect::<PosResult<Vec<_>>>()?;

        Ok(Invoice {
            subtotal: parse_money(id, "subtotal", &row.subtotal)?,
            gst: parse_money(id, "gst", &row.gst)?,
            additional_tax: parse_money(id, "additional_tax", &row.additional_tax)?,
            discount: parse_money(id, "discount", &row.discount)?,
            total: parse_money(id, "total", &row.total)?,
            items,
            date: row.date,
            payment_method: row.payment_method,
            invoice_id: row.invoice_id,
        })
    }
}

const SELECT_INVOICE: &str = "SELECT invoice_id, date, payment_method, items, subtotal, gst, \
     additional_tax, discount, total FROM invoices";

/// Acrescenta uma nota ao histórico. Retorna false, sem falhar, quando já
/// existe uma nota com o mesmo ID.
pub async fn append_invoice(conn: &mut SqliteConnection, invoice: &Invoice) -> PosResult<bool> {
    let stored: Vec<StoredLine> = invoice.items.iter().map(StoredLine::from).collect();
    let items = serde_json::to_string(&stored)?;

    let result = sqlx::query(
        "INSERT OR IGNORE INTO invoices
            (invoice_id, date, payment_method, items, subtotal, gst, additional_tax, discount, total)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&invoice.invoice_id)
    .bind(&invoice.date)
    .bind(&invoice.payment_method)
    .bind(items)
    .bind(invoice.subtotal.to_string())
    .bind(invoice.gst.to_string())
    .bind(invoice.additional_tax.to_string())
    .bind(invoice.discount.to_string())
    .bind(invoice.total.to_string())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn invoice_id_taken(conn: &mut SqliteConnection, invoice_id: &str) -> PosResult<bool> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT invoice_id FROM invoices WHERE invoice_id = ?")
            .bind(invoice_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(found.is_some())
}

/// O histórico inteiro, da nota mais antiga à mais nova.
pub async fn list_invoices(pool: &Pool<Sqlite>) -> PosResult<Vec<Invoice>> {
    let rows = sqlx::query_as::<_, InvoiceRow>(&format!("{SELECT_INVOICE} ORDER BY seq"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Invoice::try_from).collect()
}

/// Busca uma nota pelo ID, falhando com `InvoiceNotFound`.
pub async fn find_invoice(pool: &Pool<Sqlite>, invoice_id: &str) -> PosResult<Invoice> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!("{SELECT_INVOICE} WHERE invoice_id = ?"))
        .bind(invoice_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Invoice::try_from(row),
        None => Err(PosError::InvoiceNotFound(invoice_id.to_string())),
    }
}
