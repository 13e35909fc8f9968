// src/main.rs

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use sqlx::{Pool, Sqlite};
use tracing_subscriber::EnvFilter;

// Módulos
//
// Cada pasta de domínio guarda suas structs, o acesso ao banco e as rotas.
mod analysis;  // Análise de vendas (mais vendidos)
mod billing;   // Notas: histórico, renderização da imagem
mod config;    // Configuração por linha de comando / ambiente
mod error;     // Erros e mapeamento para HTTP
mod inventory; // Lista de itens
mod sales;     // Preço da sacola, checkout, log de vendas
mod shared;    // Envelope de resposta e utilitários
mod storage;   // Banco SQLite, imagens das notas, importação antiga

#[cfg(test)]
mod integration_tests;

use config::{CliArgs, ServerConfig};
use error::PosError;
use storage::database::DatabasePools;
use storage::invoice_images::InvoiceImageStore;

// Estado compartilhado: pool de leitura, pool de escrita (uma conexão) e o diretório das imagens.
pub struct AppState {
    pub db_pool: Pool<Sqlite>,
    pub db_writer: Pool<Sqlite>,
    pub invoice_images: InvoiceImageStore,
}

/// Registra todas as rotas, mais os extratores de corpo e query que
/// respondem requisições malformadas com o envelope de erro padrão.
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| PosError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| PosError::InvalidInput(err.to_string()).into()),
    )
    // Módulo de estoque
    .service(inventory::inventory_router::list_inventory)
    .service(inventory::inventory_router::add_item)
    .service(inventory::inventory_router::update_item)
    // Módulo de vendas (sacola e checkout)
    .service(sales::sales_router::add_to_cart)
    .service(sales::sales_router::checkout_cart)
    // Módulo de notas; o histórico vem antes da rota {invoice_id}
    .service(billing::billing_router::billing_history)
    .service(billing::billing_router::get_invoice)
    .service(billing::billing_router::get_invoice_alias)
    // Módulo de análise
    .service(analysis::analysis_router::sales_analysis);
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_args(CliArgs::parse());
    init_logging(&config.log_filter);

    let DatabasePools { db_pool, db_writer } = storage::database::connect(&config.storage.database_path)
        .await
        .with_context(|| {
            format!(
                "failed to open store at {}",
                config.storage.database_path.display()
            )
        })?;

    if let Some(dir) = &config.import_dir {
        storage::legacy_import::import_legacy_documents(&db_writer, dir)
            .await
            .with_context(|| format!("failed to import documents from {}", dir.display()))?;
    }

    let invoice_images = InvoiceImageStore::open(&config.storage.invoice_dir).with_context(|| {
        format!(
            "failed to create invoice directory {}",
            config.storage.invoice_dir.display()
        )
    })?;

    tracing::info!(
        bind = %config.bind,
        invoice_dir = %invoice_images.dir().display(),
        "starting point-of-sale API"
    );

    let app_state = web::Data::new(AppState {
        db_pool,
        db_writer,
        invoice_images,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(configure_services)
    })
    .bind(config.bind)?
    .run()
    .await?;

    Ok(())
}
