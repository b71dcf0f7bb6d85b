//! Errores del core (orquestación, artifacts y contrato del store).
//!
//! `CoreEngineError` es `Clone + Serialize` porque viaja dentro de los eventos
//! `StepFailed` del log de ejecución.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ArtifactFormatError;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    /// Configuración o parámetros rechazados antes de ejecutar nada.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// La secuencia de steps no respeta las dependencias declaradas.
    #[error("invalid pipeline definition: {0}")]
    InvalidDefinition(String),
    #[error("step '{step_id}' is missing required input '{artifact}'")]
    MissingInput { step_id: String, artifact: String },
    #[error(transparent)]
    ArtifactFormat(#[from] ArtifactFormatError),
    /// Envuelve cualquier fallo dentro de la transformación de un step.
    #[error("step '{step_id}' failed: {message}")]
    StepExecution { step_id: String, message: String },
    #[error("fingerprint mismatch for artifact '{artifact}': expected {expected}, found {found}")]
    CacheFingerprintMismatch {
        artifact: String,
        expected: String,
        found: String,
    },
    #[error("artifact store error: {0}")]
    Store(String),
    /// Fallo de un colaborador externo (fuente de datos, vectorizer, codec de objetos).
    #[error("collaborator error: {0}")]
    Collaborator(String),
    #[error("run cancelled after {completed_steps} step(s)")]
    Cancelled { completed_steps: usize },
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreEngineError {
    /// Id del step que originó el error, si aplica.
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::StepExecution { step_id, .. } | Self::MissingInput { step_id, .. } => Some(step_id),
            _ => None,
        }
    }
}
