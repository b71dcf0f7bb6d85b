//! Configuración y resultado de un run.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::model::{Artifact, ArtifactValue};
use crate::step::StepStatus;

/// Señal de cancelación compartida. Sólo se observa entre steps.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuración de un run: overrides de params por step, artifacts
/// externos y token de cancelación opcional.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub overrides: IndexMap<String, Value>,
    pub external: IndexMap<String, ArtifactValue>,
    pub cancel: Option<CancellationToken>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sobrescribe (merge shallow) los params de `step_id`.
    pub fn with_override(mut self, step_id: impl Into<String>, params: Value) -> Self {
        self.overrides.insert(step_id.into(), params);
        self
    }

    /// Artifact provisto por el entorno (no producido por ningún step).
    pub fn with_external(mut self, name: impl Into<String>, value: ArtifactValue) -> Self {
        self.external.insert(name.into(), value);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step_id: String,
    pub status: StepStatus,
    pub fingerprint: Option<String>,
    pub output: Option<String>,
}

/// Resultado de un run completo: artifacts producidos o reutilizados (en
/// orden de producción) y el estado final de cada step.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub run_fingerprint: String,
    pub artifacts: IndexMap<String, Artifact>,
    pub steps: Vec<StepOutcome>,
}

impl RunOutcome {
    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.get(name)
    }

    pub fn status_of(&self, step_id: &str) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.step_id == step_id).map(|s| s.status)
    }

    /// Ids de los steps que realmente se ejecutaron en este run.
    pub fn executed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Succeeded)
            .map(|s| s.step_id.as_str())
            .collect()
    }

    pub fn all_cache_hits(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::CacheHit)
    }
}

/// Entrada del plan (dry-run): fingerprint que tendría el step y si su
/// output ya está en el store.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step_id: String,
    pub output: String,
    pub fingerprint: String,
    pub cached: bool,
}
