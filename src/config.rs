// src/config.rs

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_DATABASE: &str = "pos.db";
const DEFAULT_INVOICE_DIR: &str = "invoices";
const DEFAULT_LOG_FILTER: &str = "info";

/// Argumentos de linha de comando, cada um com variável de ambiente como alternativa.
#[derive(Debug, Parser)]
#[command(name = "pos-backend", version, about = "Point-of-sale backend: inventory, checkout, invoices and sales analysis")]
pub struct CliArgs {
    /// Endereço em que o servidor HTTP escuta
    #[arg(long, env = "POS_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Arquivo do banco SQLite (criado se não existir)
    #[arg(long, env = "POS_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Diretório onde as imagens das notas são gravadas
    #[arg(long, env = "POS_INVOICE_DIR", default_value = DEFAULT_INVOICE_DIR)]
    pub invoice_dir: PathBuf,

    /// Diretório com inventory.json, products_sold.json e billing_history.json a importar na partida
    #[arg(long, env = "POS_IMPORT_DIR")]
    pub import_dir: Option<PathBuf>,

    /// Filtro de log (sintaxe do RUST_LOG)
    #[arg(long, env = "POS_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

/// Locais de armazenamento, passados explicitamente a quem abre o banco.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub invoice_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub storage: StorageConfig,
    pub import_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Self {
        let CliArgs {
            bind,
            database,
            invoice_dir,
            import_dir,
            log_filter,
        } = args;

        ServerConfig {
            bind,
            storage: StorageConfig {
                database_path: database,
                invoice_dir,
            },
            import_dir,
            log_filter,
        }
    }
}
