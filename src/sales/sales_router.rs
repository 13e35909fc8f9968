// src/sales/sales_router.rs

use actix_web::{post, web, HttpResponse};
use chrono::Local;

use super::cart::price_cart_line;
use super::checkout::checkout;
use super::sales_structs::{CartRequest, CheckoutRequest};
use crate::billing::invoice_render::render_and_save;
use crate::error::PosError;
use crate::inventory::inventory_repository;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota para colocar um item na sacola.
///
/// Confere se o item existe e tem estoque suficiente e devolve a linha com
/// preço. A sacola vive no cliente; nada é gravado.
#[post("/cart/add")]
pub async fn add_to_cart(
    data: web::Data<AppState>,
    request: web::Json<CartRequest>,
) -> Result<HttpResponse, PosError> {
    let CartRequest { id, quantity } = request.into_inner();

    let item = inventory_repository::get_item(&data.db_pool, &id).await?;
    let line = price_cart_line(&item, quantity)?;

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Added {} x {}", line.quantity, line.name),
        line,
    )))
}

/// Rota para fechar a sacola.
///
/// Executa o checkout, renderiza a imagem da nota no pool de threads
/// bloqueantes, salva e devolve como `image/png`.
#[post("/checkout")]
pub async fn checkout_cart(
    data: web::Data<AppState>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, PosError> {
    let now = Local::now().naive_local();
    let invoice = checkout(&data.db_writer, request.into_inner(), now).await?;

    let images = data.invoice_images.clone();
    let png = web::block(move || render_and_save(&images, &invoice)).await??;

    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}
