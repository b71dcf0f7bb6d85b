//! Errores de los colaboradores concretos (fuentes de datos, vectorizer).
use std::path::PathBuf;

use reco_core::CoreEngineError;
use reco_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse dataset: {0}")]
    Parse(String),
    /// Dataset estructuralmente válido pero inaceptable (ids repetidos, columnas faltantes).
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Core(#[from] CoreEngineError),
}

impl From<AdapterError> for CoreEngineError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Core(e) => e,
            other => CoreEngineError::Collaborator(other.to_string()),
        }
    }
}
