// src/billing/billing_router.rs

use actix_web::{get, web, HttpResponse};

use super::billing_repository;
use super::invoice_render::render_and_save;
use crate::error::PosError;
use crate::AppState;

/// Rota para devolver todas as notas guardadas, da mais antiga à mais nova.
#[get("/billing/history")]
pub async fn billing_history(data: web::Data<AppState>) -> Result<HttpResponse, PosError> {
    let invoices = billing_repository::list_invoices(&data.db_pool).await?;
    tracing::debug!(count = invoices.len(), "billing history listed");
    Ok(HttpResponse::Ok().json(invoices))
}

/// Rota para renderizar de novo a imagem de uma nota a partir do registro guardado.
#[get("/billing/{invoice_id}")]
pub async fn get_invoice(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, PosError> {
    invoice_image(data, path.into_inner()).await
}

/// O mesmo que `get_invoice`, no caminho usado pelo frontend web.
#[get("/invoice/{invoice_id}")]
pub async fn get_invoice_alias(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, PosError> {
    invoice_image(data, path.into_inner()).await
}

async fn invoice_image(
    data: web::Data<AppState>,
    invoice_id: String,
) -> Result<HttpResponse, PosError> {
    let invoice = billing_repository::find_invoice(&data.db_pool, &invoice_id).await?;

    // Sem cache: a imagem é refeita do registro a cada requisição
    let images = data.invoice_images.clone();
    let png = web::block(move || render_and_save(&images, &invoice)).await??;

    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}
