//! Tipos de evento de una ejecución y estructura `RunEvent`.
//!
//! Rol en el pipeline:
//! - Cada `Orchestrator::run` emite eventos a un `EventStore` append-only.
//! - El `RunRepository` reconstruye el estado de cada step (replay) a partir
//!   de estos eventos, sin estructuras mutables compartidas.
//! - El timestamp es metadato: nunca entra en un fingerprint.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreEngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija el hash de la definición.
    RunStarted { definition_hash: String, step_count: usize },
    /// El step no estaba en cache y comienza a ejecutarse.
    StepStarted {
        step_index: usize,
        step_id: String,
        fingerprint: String,
    },
    /// El output ya existía en el store con el fingerprint esperado; se reutiliza.
    StepCacheHit {
        step_index: usize,
        step_id: String,
        output: String,
        fingerprint: String,
    },
    /// El step terminó y su output quedó persistido.
    StepFinished {
        step_index: usize,
        step_id: String,
        output: String,
        fingerprint: String,
    },
    /// Error terminal. El run no continúa (stop-on-failure).
    StepFailed {
        step_index: usize,
        step_id: String,
        error: CoreEngineError,
        fingerprint: String,
    },
    /// Cancelación observada en una frontera entre steps.
    RunCancelled { completed_steps: usize },
    /// Cierre con fingerprint agregado (hash de los fingerprints de steps en orden).
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}
