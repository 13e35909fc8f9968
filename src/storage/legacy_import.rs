// src/storage/legacy_import.rs

use serde::de::DeserializeOwned;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use std::fs;
use std::path::Path;

use super::database::count_rows;
use crate::billing::billing_repository;
use crate::billing::billing_structs::Invoice;
use crate::error::PosResult;
use crate::inventory::inventory_repository;
use crate::inventory::inventory_structs::Item;
use crate::sales::sales_repository;
use crate::sales::sales_structs::SoldRecord;
use crate::shared::shared_utils::validate_amount;

pub const INVENTORY_DOCUMENT: &str = "inventory.json";
pub const SOLD_PRODUCTS_DOCUMENT: &str = "products_sold.json";
pub const BILLING_HISTORY_DOCUMENT: &str = "billing_history.json";

/// `{admin: {}, items: [...]}`; a seção admin nunca foi usada.
#[derive(Deserialize)]
struct InventoryDocument {
    #[serde(default)]
    items: Vec<Item>,
}

/// Quantos registros cada documento trouxe.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub items: usize,
    pub sold_records: usize,
    pub invoices: usize,
}

fn read_document<T: DeserializeOwned>(path: &Path) -> PosResult<Option<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "legacy document missing, skipped");
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

fn invoice_amounts_valid(invoice: &Invoice) -> bool {
    let totals = [
        &invoice.subtotal,
        &invoice.gst,
        &invoice.additional_tax,
        &invoice.discount,
        &invoice.total,
    ];
    totals
        .into_iter()
        .chain(invoice.items.iter().map(|line| &line.subtotal))
        .all(|amount| validate_amount("amount", amount).is_ok())
}

/// Carrega de `dir` os documentos JSON do antigo armazenamento em arquivos.
///
/// Cada documento só é importado enquanto sua tabela está vazia, então rodar
/// a importação a cada partida não faz mal. Itens com ID ou nome repetido,
/// registros de venda com quantidade negativa e qualquer registro com valor
/// monetário negativo ou fora da faixa são pulados. `writer` é o pool de escrita.
pub async fn import_legacy_documents(writer: &Pool<Sqlite>, dir: &Path) -> PosResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    if count_rows(writer, "items").await? == 0 {
        if let Some(document) = read_document::<InventoryDocument>(&dir.join(INVENTORY_DOCUMENT))? {
            let mut transaction = writer.begin().await?;
            for item in &document.items {
                if item.quantity < 0 || validate_amount("price", &item.price).is_err() {
                    tracing::warn!(id = %item.id, "legacy item with invalid values skipped");
                    continue;
                }
                if inventory_repository::insert_item(&mut transaction, item).await? {
                    summary.items += 1;
                } else {
                    tracing::warn!(id = %item.id, name = %item.name, "legacy item collides, skipped");
                }
            }
            transaction.commit().await?;
        }
    }

    if count_rows(writer, "sold_products").await? == 0 {
        if let Some(records) =
            read_document::<Vec<SoldRecord>>(&dir.join(SOLD_PRODUCTS_DOCUMENT))?
        {
            let mut transaction = writer.begin().await?;
            for record in &records {
                if record.quantity < 0 {
                    tracing::warn!(
                        id = %record.item_id,
                        quantity = record.quantity,
                        "legacy sold record with negative quantity skipped"
                    );
                    continue;
                }
                sales_repository::log_sold_product(&mut transaction, record).await?;
                summary.sold_records += 1;
            }
            transaction.commit().await?;
        }
    }

    if count_rows(writer, "invoices").await? == 0 {
        if let Some(invoices) =
            read_document::<Vec<Invoice>>(&dir.join(BILLING_HISTORY_DOCUMENT))?
        {
            let mut transaction = writer.begin().await?;
            for invoice in &invoices {
                if !invoice_amounts_valid(invoice) {
                    tracing::warn!(invoice_id = %invoice.invoice_id, "legacy invoice with invalid amounts skipped");
                    continue;
                }
                if billing_repository::append_invoice(&mut transaction, invoice).await? {
                    summary.invoices += 1;
                }
            }
            transaction.commit().await?;
        }
    }

    tracing::info!(
        dir = %dir.display(),
        items = summary.items,
        sold_records = summary.sold_records,
        invoices = summary.invoices,
        "legacy documents imported"
    );
    Ok(summary)
}
