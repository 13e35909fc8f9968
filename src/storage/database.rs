// src/storage/database.rs

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

use crate::error::PosResult;

/// Tempo que uma conexão espera por um lock do SQLite antes de desistir.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
/// Conexões do pool de leitura.
const READ_CONNECTIONS: u32 = 5;

/// Tabelas do banco. As colunas `seq` guardam a ordem de inserção;
/// os IDs entregues aos clientes ficam em colunas próprias e únicas.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS items (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        name_key TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        price TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0)
    )",
    "CREATE TABLE IF NOT EXISTS sold_products (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id TEXT NOT NULL,
        product TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        timestamp TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS invoices (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_id TEXT NOT NULL UNIQUE,
        date TEXT NOT NULL,
        payment_method TEXT NOT NULL,
        items TEXT NOT NULL,
        subtotal TEXT NOT NULL,
        gst TEXT NOT NULL,
        additional_tax TEXT NOT NULL,
        discount TEXT NOT NULL,
        total TEXT NOT NULL
    )",
];

/// Os dois pools abertos sobre o mesmo arquivo.
///
/// `db_writer` tem uma única conexão: toda transação que escreve passa por
/// ele, então as escritas fazem fila na aquisição da conexão em vez de
/// disputar o lock do SQLite. `db_pool` serve apenas leituras, que no modo
/// WAL não bloqueiam nem são bloqueadas pela escrita em andamento.
pub struct DatabasePools {
    pub db_pool: Pool<Sqlite>,
    pub db_writer: Pool<Sqlite>,
}

fn connect_options(database_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
}

/// Abre (criando se não existir) o arquivo SQLite e aplica o schema.
pub async fn connect(database_path: &Path) -> PosResult<DatabasePools> {
    let db_writer = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(database_path))
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&db_writer).await?;
    }

    let db_pool = SqlitePoolOptions::new()
        .max_connections(READ_CONNECTIONS)
        .connect_with(connect_options(database_path))
        .await?;

    tracing::info!(path = %database_path.display(), "store ready");
    Ok(DatabasePools { db_pool, db_writer })
}

/// Número de linhas de uma das tabelas do banco.
pub async fn count_rows(pool: &Pool<Sqlite>, table: &str) -> PosResult<i64> {
    // Só é chamada com os nomes fixos das tabelas acima
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count)
}
