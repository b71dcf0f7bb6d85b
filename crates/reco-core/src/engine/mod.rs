//! Engine module: orquestador, builder y tipos de run.

pub mod builder;
pub mod core;
pub mod run;

pub use builder::{OrchestratorBuilder, OrchestratorBuilderInit};
pub use core::Orchestrator;
pub use run::{CancellationToken, PlannedStep, RunConfig, RunOutcome, StepOutcome};
