use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Artifact;
use crate::errors::CoreEngineError;

/// Contexto de ejecución entregado a `StepDefinition::run`.
pub struct ExecutionContext {
    pub step_id: String,
    pub inputs: IndexMap<String, Artifact>, // en el orden declarado por el step
    pub params: Value,                      // params efectivos (base + overrides)
}

impl ExecutionContext {
    /// Artifact de entrada por nombre.
    pub fn input(&self, name: &str) -> Result<&Artifact, CoreEngineError> {
        self.inputs.get(name).ok_or_else(|| CoreEngineError::MissingInput { step_id: self.step_id.clone(),
                                                                            artifact: name.to_string() })
    }

    /// Decodifica los params a un tipo concreto.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, CoreEngineError> {
        serde_json::from_value(self.params.clone()).map_err(|e| {
            CoreEngineError::InvalidArgument(format!("params for step '{}': {e}", self.step_id))
        })
    }
}
