// src/analysis/sales_ranking.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use super::analysis_structs::SalesAnalysis;
use crate::error::{PosError, PosResult};
use crate::sales::sales_structs::SoldRecord;

/// Quantos produtos a análise mantém.
pub const TOP_PRODUCTS: usize = 10;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Lê um horário no estilo ISO 8601.
///
/// Uma data sozinha significa meia-noite. Com fuso explícito, a hora local
/// é mantida e o fuso descartado, então tudo se compara como hora local
/// sem fuso, igual aos próprios registros de venda.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(timestamp);
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_local());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Lê um limite opcional da consulta. Ausente ou vazio significa sem limite;
/// qualquer outro valor precisa ser um horário válido.
pub fn parse_bound(value: Option<&str>) -> PosResult<Option<NaiveDateTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| PosError::InvalidTimestamp(raw.to_string())),
    }
}

/// Ordena os produtos pela quantidade vendida entre `start` e `end`, inclusive.
///
/// Registros com horário ilegível são ignorados. Produtos com o mesmo total
/// mantêm a ordem em que foram vendidos pela primeira vez. Os totais
/// saturam em `i64::MAX` em vez de estourar.
pub fn rank_sales(
    records: &[SoldRecord],
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> SalesAnalysis {
    let mut totals: IndexMap<&str, i64> = IndexMap::new();

    for record in records {
        let Some(timestamp) = parse_timestamp(&record.timestamp) else {
            continue;
        };
        if start.is_some_and(|start| timestamp < start) {
            continue;
        }
        if end.is_some_and(|end| timestamp > end) {
            continue;
        }
        let total = totals.entry(record.product.as_str()).or_insert(0);
        *total = total.saturating_add(record.quantity);
    }

    let mut ranked: Vec<(&str, i64)> = totals.into_iter().collect();
    // Ordenação estável: empates ficam na ordem de aparição
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_PRODUCTS);

    let (labels, data): (Vec<String>, Vec<i64>) = ranked
        .into_iter()
        .map(|(name, quantity)| (name.to_string(), quantity))
        .unzip();
    SalesAnalysis { labels, data }
}
