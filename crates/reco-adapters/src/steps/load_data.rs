//! LoadDataStep (source)
//!
//! - Sin inputs; produce `raw_data` como tabla.
//! - Los params base son la descripción de la fuente, de modo que cambiar el
//!   archivo o el dataset inline cambia el fingerprint.
//! - Al ejecutar, la lectura debe coincidir con la descripción que entró en
//!   el fingerprint; si la fuente cambió entre medio, el step falla en vez de
//!   guardar datos nuevos bajo el fingerprint viejo.
//! - Implementa `StepDefinition` directamente: la fuente es un trait object
//!   y sus params no son un tipo fijo.
use log::debug;
use reco_core::model::ExecutionContext;
use reco_core::{ArtifactFormat, ArtifactValue, CoreEngineError, OutputSpec, StepDefinition, StepRunResult};
use serde_json::{json, Value};

use super::LOAD_DATA;
use crate::artifacts::RAW_DATA;
use crate::source::DataSource;

#[derive(Debug)]
pub struct LoadDataStep {
    source: Box<dyn DataSource>,
}

impl LoadDataStep {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self { source: Box::new(source) }
    }

    fn load(&self, ctx: &ExecutionContext) -> Result<ArtifactValue, CoreEngineError> {
        let (dataset, description) = self.source.snapshot()?;
        if ctx.params.get("source") != Some(&description) {
            return Err(CoreEngineError::Collaborator("data source changed after its fingerprint was computed".into()));
        }
        // el índice rechaza ids repetidos antes de persistir nada
        dataset.id_index()?;
        debug!("loaded {} records", dataset.len());
        Ok(ArtifactValue::Table(dataset.to_table()?))
    }
}

impl StepDefinition for LoadDataStep {
    fn id(&self) -> &str {
        LOAD_DATA
    }

    fn inputs(&self) -> Vec<String> {
        Vec::new()
    }

    fn output(&self) -> OutputSpec {
        OutputSpec::new(RAW_DATA, ArtifactFormat::Table)
    }

    fn base_params(&self) -> Result<Value, CoreEngineError> {
        Ok(json!({ "source": self.source.describe()? }))
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        self.load(ctx).into()
    }
}
