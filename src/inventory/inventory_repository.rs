// src/inventory/inventory_repository.rs

use bigdecimal::BigDecimal;
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};
use std::str::FromStr;

use super::inventory_structs::{name_key, Item, ItemUpdate, NewItem};
use crate::error::{PosError, PosResult};
use crate::shared::shared_utils::{new_short_id, round_money};

/// Linha da tabela `items`. O preço fica como texto decimal,
/// já que o SQLite não tem tipo decimal exato.
#[derive(FromRow)]
struct ItemRow {
    id: String,
    name: String,
    description: String,
    price: String,
    quantity: i64,
}

impl TryFrom<ItemRow> for Item {
    type Error = PosError;

    fn try_from(row: ItemRow) -> PosResult<Self> {
        let price = BigDecimal::from_str(&row.price).map_err(|_| {
            PosError::CorruptRecord(format!("item {} has price '{}'", row.id, row.price))
        })?;

        Ok(Item {
            id: row.id,
            name: row.name,
            description: row.description,
            price,
            quantity: row.quantity,
        })
    }
}

const SELECT_ITEM: &str = "SELECT id, name, description, price, quantity FROM items";

/// Todos os itens, na ordem de inserção.
pub async fn list_items(pool: &Pool<Sqlite>) -> PosResult<Vec<Item>> {
    let rows = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEM} ORDER BY seq"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Item::try_from).collect()
}

/// Busca um item ou falha com `ItemNotFound`.
pub async fn get_item(pool: &Pool<Sqlite>, id: &str) -> PosResult<Item> {
    let mut conn = pool.acquire().await?;
    fetch_item(&mut conn, id)
        .await?
        .ok_or_else(|| PosError::ItemNotFound(id.to_string()))
}

async fn fetch_item(conn: &mut SqliteConnection, id: &str) -> PosResult<Option<Item>> {
    let row = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEM} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Item::try_from).transpose()
}

async fn name_taken(conn: &mut SqliteConnection, key: &str) -> PosResult<bool> {
    let found: Option<String> = sqlx::query_scalar("SELECT id FROM items WHERE name_key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn id_taken(conn: &mut SqliteConnection, id: &str) -> PosResult<bool> {
    let found: Option<String> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Insere o item como está. Retorna false, sem falhar, quando o ID ou o
/// nome (sem diferenciar maiúsculas) já existem.
pub async fn insert_item(conn: &mut SqliteConnection, item: &Item) -> PosResult<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO items (id, name, name_key, description, price, quantity)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(item.name_key())
    .bind(&item.description)
    .bind(item.price.to_string())
    .bind(item.quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Cria um item com um ID novo.
///
/// Falha com `DuplicateItem` quando outro item já tem o mesmo nome, sem
/// diferenciar maiúsculas. `writer` deve ser o pool de escrita
/// (`DatabasePools::db_writer`), que serializa as transações.
pub async fn add_item(writer: &Pool<Sqlite>, new_item: NewItem) -> PosResult<Item> {
    new_item.validate()?;

    let mut transaction = writer.begin().await?;

    if name_taken(&mut transaction, &name_key(&new_item.name)).await? {
        return Err(PosError::DuplicateItem(new_item.name));
    }

    let mut id = new_short_id();
    while id_taken(&mut transaction, &id).await? {
        id = new_short_id();
    }

    let item = Item {
        id,
        name: new_item.name.trim().to_string(),
        description: new_item.description,
        price: round_money(&new_item.price),
        quantity: new_item.quantity,
    };

    if !insert_item(&mut transaction, &item).await? {
        // Outra inserção com o mesmo nome chegou antes
        return Err(PosError::DuplicateItem(item.name));
    }
    transaction.commit().await?;

    tracing::info!(id = %item.id, name = %item.name, quantity = item.quantity, "item added");
    Ok(item)
}

/// Aplica ao item `id` os campos presentes em `changes`, pelo pool de escrita.
pub async fn update_item(writer: &Pool<Sqlite>, id: &str, changes: ItemUpdate) -> PosResult<Item> {
    changes.validate()?;

    let mut transaction = writer.begin().await?;

    let mut item = fetch_item(&mut transaction, id)
        .await?
        .ok_or_else(|| PosError::ItemNotFound(id.to_string()))?;
    changes.apply_to(&mut item);

    sqlx::query("UPDATE items SET description = ?, price = ?, quantity = ? WHERE id = ?")
        .bind(&item.description)
        .bind(item.price.to_string())
        .bind(item.quantity)
        .bind(&item.id)
        .execute(&mut *transaction)
        .await?;
    transaction.commit().await?;

    tracing::info!(id = %item.id, "item updated");
    Ok(item)
}

/// Retira `qty` unidades do estoque do item `id`.
///
/// A subtração é um único UPDATE condicional, então a quantidade guardada
/// nunca fica negativa. Quando nada é alterado, o item é consultado para
/// distinguir `ItemNotFound` de `InsufficientStock`; nos dois casos a
/// quantidade guardada não muda.
pub async fn decrease_stock(conn: &mut SqliteConnection, id: &str, qty: i64) -> PosResult<()> {
    if qty <= 0 {
        return Err(PosError::InvalidInput(format!(
            "quantity for item {id} must be positive (got {qty})"
        )));
    }

    let result = sqlx::query(
        "UPDATE items SET quantity = quantity - ? WHERE id = ? AND quantity >= ?",
    )
    .bind(qty)
    .bind(id)
    .bind(qty)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    match fetch_item(conn, id).await? {
        Some(item) => Err(PosError::InsufficientStock {
            id: id.to_string(),
            requested: qty,
            available: item.quantity,
        }),
        None => Err(PosError::ItemNotFound(id.to_string())),
    }
}
