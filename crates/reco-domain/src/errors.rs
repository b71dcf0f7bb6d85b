//! Errores del dominio de similitud y recomendación.
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum DomainError {
    /// Id ausente del `IdIndex`. Recuperable por request.
    #[error("unknown entity id {0}")]
    UnknownEntity(i64),
    /// `k` no positivo, configuración mal formada.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl From<reco_core::model::ShapeError> for DomainError {
    fn from(e: reco_core::model::ShapeError) -> Self {
        DomainError::ShapeMismatch(e.0)
    }
}
