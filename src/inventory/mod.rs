// src/inventory/mod.rs

// Structs de itens (item guardado e corpos das requisições)
pub mod inventory_structs;
// Acesso ao banco para a lista de itens
pub mod inventory_repository;
// Rotas HTTP do estoque
pub mod inventory_router;
