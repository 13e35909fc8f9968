// src/analysis/analysis_router.rs

use actix_web::{get, web, HttpResponse};

use super::analysis_structs::SalesQuery;
use super::sales_ranking::{parse_bound, rank_sales};
use crate::error::PosError;
use crate::sales::sales_repository;
use crate::AppState;

/// Rota para o ranking dos produtos mais vendidos, opcionalmente entre `start` e `end`.
#[get("/analysis")]
pub async fn sales_analysis(
    data: web::Data<AppState>,
    query: web::Query<SalesQuery>,
) -> Result<HttpResponse, PosError> {
    let start = parse_bound(query.start.as_deref())?;
    let end = parse_bound(query.end.as_deref())?;

    let records = sales_repository::list_sold_records(&data.db_pool).await?;
    let analysis = rank_sales(&records, start, end);

    tracing::debug!(records = records.len(), products = analysis.labels.len(), "sales analysed");
    Ok(HttpResponse::Ok().json(analysis))
}
