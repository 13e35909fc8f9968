// src/storage/mod.rs

// Pools de conexão e schema do banco SQLite embutido
pub mod database;
// Diretório com um PNG renderizado por ID de nota
pub mod invoice_images;
// Importação única dos documentos JSON do armazenamento em arquivos
pub mod legacy_import;
