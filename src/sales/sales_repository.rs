// src/sales/sales_repository.rs

use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};

use super::sales_structs::SoldRecord;
use crate::error::PosResult;

#[derive(FromRow)]
struct SoldRow {
    item_id: String,
    product: String,
    quantity: i64,
    timestamp: String,
}

impl From<SoldRow> for SoldRecord {
    fn from(row: SoldRow) -> Self {
        SoldRecord {
            item_id: row.item_id,
            product: row.product,
            quantity: row.quantity,
            timestamp: row.timestamp,
        }
    }
}

/// Acrescenta um registro ao log de produtos vendidos.
pub async fn log_sold_product(conn: &mut SqliteConnection, record: &SoldRecord) -> PosResult<()> {
    sqlx::query(
        "INSERT INTO sold_products (item_id, product, quantity, timestamp) VALUES (?, ?, ?, ?)",
    )
    .bind(&record.item_id)
    .bind(&record.product)
    .bind(record.quantity)
    .bind(&record.timestamp)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// O log inteiro, do mais antigo ao mais novo.
pub async fn list_sold_records(pool: &Pool<Sqlite>) -> PosResult<Vec<SoldRecord>> {
    let rows = sqlx::query_as::<_, SoldRow>(
        "SELECT item_id, product, quantity, timestamp FROM sold_products ORDER BY seq",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SoldRecord::from).collect())
}
