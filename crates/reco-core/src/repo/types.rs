//! Tipos de repositorio: estado reconstruido (`RunInstance`) y definición
//! (`PipelineDefinition`).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! actualiza un `StepSlot` por step. No guarda artifacts (sólo nombres y
//! fingerprints); los bytes viven en el `ArtifactStore`.
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreEngineError;
use crate::event::{RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::step::{StepDefinition, StepStatus};

#[derive(Debug, Clone)]
pub struct RunInstance {
    pub id: Uuid,
    pub steps: Vec<StepSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub cancelled: bool,
}

/// Estado de un step en la instancia.
#[derive(Debug, Clone)]
pub struct StepSlot {
    pub step_id: String,
    pub status: StepStatus,
    pub fingerprint: Option<String>,
    pub output: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Trait para reconstruir (`replay`) el estado de un run a partir de eventos.
pub trait RunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance;
}

/// Definición inmutable del pipeline.
#[derive(Debug)]
pub struct PipelineDefinition {
    pub steps: Vec<Box<dyn StepDefinition>>,
    pub definition_hash: String,
}

impl PipelineDefinition {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, step_id: &str) -> Option<&dyn StepDefinition> {
        self.steps.iter().find(|s| s.id() == step_id).map(|s| s.as_ref())
    }

    /// Comprueba el orden de dependencias: ids y outputs únicos, y cada input
    /// declarado es output de un step anterior o está en `external`.
    pub fn validate(&self, external: &[&str]) -> Result<(), CoreEngineError> {
        if self.steps.is_empty() {
            return Err(CoreEngineError::InvalidDefinition("pipeline has no steps".into()));
        }
        let mut ids: HashSet<&str> = HashSet::new();
        let mut available: HashSet<String> = external.iter().map(|s| s.to_string()).collect();
        for step in &self.steps {
            if !ids.insert(step.id()) {
                return Err(CoreEngineError::InvalidDefinition(format!("duplicate step id '{}'", step.id())));
            }
            for input in step.inputs() {
                if !available.contains(&input) {
                    return Err(CoreEngineError::InvalidDefinition(format!("step '{}' requires '{input}' which no earlier step produces",
                                                                          step.id())));
                }
            }
            let out = step.output().name;
            if !available.insert(out.clone()) {
                return Err(CoreEngineError::InvalidDefinition(format!("artifact '{out}' is produced twice")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRunRepository;

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance {
        let mut steps: Vec<StepSlot> = definition.steps
                                                 .iter()
                                                 .map(|s| StepSlot { step_id: s.id().to_string(),
                                                                     status: StepStatus::Pending,
                                                                     fingerprint: None,
                                                                     output: None,
                                                                     started_at: None,
                                                                     finished_at: None })
                                                 .collect();
        let mut completed = false;
        let mut cancelled = false;
        for ev in events {
            match &ev.kind {
                RunEventKind::RunStarted { .. } => {}
                RunEventKind::StepStarted { step_index, fingerprint, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Running;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.started_at = Some(ev.ts);
                    }
                }
                RunEventKind::StepCacheHit { step_index,
                                             output,
                                             fingerprint,
                                             .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::CacheHit;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.output = Some(output.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StepFinished { step_index,
                                             output,
                                             fingerprint,
                                             .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Succeeded;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.output = Some(output.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StepFailed { step_index, fingerprint, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::RunCancelled { .. } => cancelled = true,
                RunEventKind::RunCompleted { .. } => completed = true,
            }
        }
        let cursor = steps.iter()
                          .position(|s| matches!(s.status, StepStatus::Pending))
                          .unwrap_or(steps.len());
        RunInstance { id: run_id,
                      steps,
                      cursor,
                      completed,
                      cancelled }
    }
}

/// Construye la definición a partir de los steps; el hash cubre ids,
/// inputs y outputs declarados en orden.
pub fn build_pipeline_definition(steps: Vec<Box<dyn StepDefinition>>) -> PipelineDefinition {
    let shape: Vec<serde_json::Value> = steps.iter()
                                             .map(|s| {
                                                 let out = s.output();
                                                 serde_json::json!({
                                                     "id": s.id(),
                                                     "inputs": s.inputs(),
                                                     "output": { "name": out.name, "format": out.format.as_str() },
                                                 })
                                             })
                                             .collect();
    let definition_hash = hash_value(&serde_json::Value::Array(shape));
    PipelineDefinition { steps, definition_hash }
}
