// src/inventory/inventory_router.rs

use actix_web::{get, post, put, web, HttpResponse};

use super::inventory_repository;
use super::inventory_structs::{ItemUpdate, NewItem};
use crate::error::PosError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota para listar todos os itens do estoque, na ordem de inserção.
#[get("/inventory")]
pub async fn list_inventory(data: web::Data<AppState>) -> Result<HttpResponse, PosError> {
    let items = inventory_repository::list_items(&data.db_pool).await?;
    tracing::debug!(count = items.len(), "inventory listed");
    Ok(HttpResponse::Ok().json(items))
}

/// Rota para adicionar um novo item.
///
/// Recebe o item via JSON no corpo da requisição. Nomes são únicos sem
/// diferenciar maiúsculas, então um segundo "widget" ao lado de "Widget" é recusado.
#[post("/inventory/add")]
pub async fn add_item(
    data: web::Data<AppState>,
    new_item: web::Json<NewItem>,
) -> Result<HttpResponse, PosError> {
    let item = inventory_repository::add_item(&data.db_writer, new_item.into_inner()).await?;

    Ok(HttpResponse::Created().json(GenericResponse::success("Item added successfully", item)))
}

/// Rota para alterar descrição, preço e/ou quantidade de um item.
/// Campos ausentes no corpo ficam inalterados.
#[put("/inventory/update/{id}")]
pub async fn update_item(
    data: web::Data<AppState>,
    path: web::Path<String>,
    changes: web::Json<ItemUpdate>,
) -> Result<HttpResponse, PosError> {
    let id = path.into_inner();
    let item = inventory_repository::update_item(&data.db_writer, &id, changes.into_inner()).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::success("Item updated successfully", item)))
}
