use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{StepDefinition, StepRunResult};
use crate::errors::CoreEngineError;
use crate::model::{ArtifactValue, ExecutionContext, OutputSpec};

/// Interfaz de alto nivel para definir Steps con params fuertemente tipados.
///
/// Implementadores escriben `run_typed` con el tipo concreto de params; el
/// adaptador de abajo la convierte a la interfaz neutra `StepDefinition`.
pub trait TypedStep {
    /// Parámetros (de)serializables. El JSON resultante entra al fingerprint.
    type Params: DeserializeOwned + Serialize + Clone;

    fn id(&self) -> &'static str;

    fn name(&self) -> &str {
        self.id()
    }

    fn inputs(&self) -> &'static [&'static str];

    fn output(&self) -> OutputSpec;

    /// Parámetros configurados en la instancia del step.
    fn params(&self) -> Self::Params;

    fn run_typed(&self, ctx: &ExecutionContext, params: Self::Params) -> Result<ArtifactValue, CoreEngineError>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStep` implementa `StepDefinition` neutro.
// -------------------------------------------------------------
impl<T> StepDefinition for T where T: TypedStep + std::fmt::Debug
{
    fn id(&self) -> &str {
        <Self as TypedStep>::id(self)
    }

    fn name(&self) -> &str {
        <Self as TypedStep>::name(self)
    }

    fn inputs(&self) -> Vec<String> {
        <Self as TypedStep>::inputs(self).iter().map(|s| s.to_string()).collect()
    }

    fn output(&self) -> OutputSpec {
        <Self as TypedStep>::output(self)
    }

    fn base_params(&self) -> Result<Value, CoreEngineError> {
        serde_json::to_value(self.params()).map_err(|e| CoreEngineError::Internal(format!("serialize params: {e}")))
    }

    fn validate_params(&self, params: &Value) -> Result<(), CoreEngineError> {
        serde_json::from_value::<T::Params>(params.clone()).map(|_| ()).map_err(|e| {
            CoreEngineError::InvalidArgument(format!("params for step '{}': {e}", <Self as TypedStep>::id(self)))
        })
    }

    fn run(&self, ctx: &ExecutionContext) -> StepRunResult {
        ctx.params_as::<T::Params>().and_then(|p| self.run_typed(ctx, p)).into()
    }
}
