// src/billing/mod.rs

// Structs da nota e cálculo dos impostos
pub mod billing_structs;
// Acesso ao banco para o histórico de notas
pub mod billing_repository;
// Imagem da nota: layout, rasterização, codificação PNG
pub mod invoice_render;
// Rotas HTTP do histórico de notas
pub mod billing_router;
