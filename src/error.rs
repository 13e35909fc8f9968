// src/error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::shared::shared_structs::GenericResponse;

/// Toda falha que as operações do caixa podem devolver a quem chama.
#[derive(Debug, Error)]
pub enum PosError {
    #[error("Item already exists: {0}")]
    DuplicateItem(String),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Insufficient stock for item {id}: requested {requested}, available {available}")]
    InsufficientStock {
        id: String,
        requested: i64,
        available: i64,
    },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invoice image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Background task was cancelled")]
    Blocking,
}

pub type PosResult<T> = Result<T, PosError>;

impl From<actix_web::error::BlockingError> for PosError {
    fn from(_: actix_web::error::BlockingError) -> Self {
        PosError::Blocking
    }
}

impl ResponseError for PosError {
    fn status_code(&self) -> StatusCode {
        match self {
            PosError::DuplicateItem(_)
            | PosError::InsufficientStock { .. }
            | PosError::EmptyCart
            | PosError::InvalidInput(_)
            | PosError::InvalidTimestamp(_) => StatusCode::BAD_REQUEST,
            PosError::ItemNotFound(_) | PosError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,
            PosError::CorruptRecord(_)
            | PosError::Database(_)
            | PosError::Image(_)
            | PosError::Io(_)
            | PosError::Serialization(_)
            | PosError::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Detalhes internos ficam no log; o cliente recebe uma mensagem genérica
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error = %self, "request rejected");
            self.to_string()
        };

        HttpResponse::build(status).json(GenericResponse::<()>::error(message))
    }
}
