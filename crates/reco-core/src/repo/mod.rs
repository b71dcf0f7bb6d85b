pub mod types;
pub use types::{build_pipeline_definition, InMemoryRunRepository, PipelineDefinition, RunInstance, RunRepository, StepSlot};
