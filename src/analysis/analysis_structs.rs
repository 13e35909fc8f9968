// src/analysis/analysis_structs.rs

use serde::{Deserialize, Serialize};

/// Limites opcionais da análise, como chegam na query string.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Mais vendidos em duas sequências paralelas, prontas para um gráfico de barras.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct SalesAnalysis {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}
