//! Errores del store en disco.
//! Se traducen a `CoreEngineError` en la frontera con el orquestador; el
//! detalle de cada codec no sale de este crate.

use std::path::PathBuf;

use reco_core::{ArtifactFormatError, CoreEngineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(String),
    /// El valor no tiene la forma que el codec exige (p.ej. no-tabla al codec de tablas).
    #[error(transparent)]
    Format(#[from] ArtifactFormatError),
    /// Bytes ilegibles, manifest inválido o hash de contenido distinto.
    #[error("corrupt artifact: {0}")]
    Corrupt(String),
    #[error("fingerprint mismatch for '{artifact}': expected {expected}, found {found}")]
    FingerprintMismatch {
        artifact: String,
        expected: String,
        found: String,
    },
    #[error("invalid artifact name '{0}'")]
    InvalidName(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(),
                   source }
    }
}

impl From<StoreError> for CoreEngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Format(e) => CoreEngineError::ArtifactFormat(e),
            StoreError::FingerprintMismatch { artifact, expected, found } => {
                CoreEngineError::CacheFingerprintMismatch { artifact,
                                                            expected,
                                                            found }
            }
            StoreError::InvalidName(name) => CoreEngineError::InvalidArgument(format!("invalid artifact name '{name}'")),
            other => CoreEngineError::Store(other.to_string()),
        }
    }
}
