// src/sales/mod.rs

// Structs de vendas (registro de venda, linha da sacola, corpo do checkout)
pub mod sales_structs;
// Preço da linha ao adicionar à sacola, sem gravar nada
pub mod cart;
// Log de produtos vendidos, só acrescenta
pub mod sales_repository;
// Checkout: estoque, log de vendas, nota
pub mod checkout;
// Rotas HTTP da sacola e do checkout
pub mod sales_router;
