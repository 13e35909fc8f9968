// src/shared/mod.rs

// Structs compartilhadas por todos os módulos (envelope de resposta)
pub mod shared_structs;
// Utilitários: IDs curtos, valores monetários, desserializadores tolerantes
pub mod shared_utils;
