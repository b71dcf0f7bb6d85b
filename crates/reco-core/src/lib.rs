//! reco-core: orquestador determinista de pipelines con artifacts versionados.
//!
//! - `engine`: `Orchestrator`, builder, `RunConfig`/`RunOutcome`.
//! - `step`: contrato de steps (`StepDefinition`, `TypedStep`).
//! - `model`: `Artifact`, formatos, matrices y tablas neutrales, fingerprint.
//! - `store`: contrato `ArtifactStore` + backend en memoria.
//! - `event` / `repo`: log append-only de ejecución y su replay.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod injection;
pub mod model;
pub mod repo;
pub mod step;
pub mod store;

pub use engine::{CancellationToken, Orchestrator, PlannedStep, RunConfig, RunOutcome, StepOutcome};
pub use errors::CoreEngineError;
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use model::{Artifact, ArtifactFormat, ArtifactFormatError, ArtifactValue, Column, CsrMatrix, DenseMatrix,
                NumericArray, OutputSpec, Table};
pub use repo::{build_pipeline_definition, InMemoryRunRepository, PipelineDefinition, RunRepository};
pub use step::{StepDefinition, StepRunResult, StepStatus, TypedStep};
pub use store::{ArtifactStore, InMemoryArtifactStore};
