// src/analysis/mod.rs

// Structs de consulta e resposta da análise de vendas
pub mod analysis_structs;
// Leitura de horários e ranking dos produtos vendidos
pub mod sales_ranking;
// Rota HTTP da análise de vendas
pub mod analysis_router;
