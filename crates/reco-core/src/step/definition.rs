use std::fmt::Debug;

use serde_json::Value;

use super::run_result::StepRunResult;
use crate::errors::CoreEngineError;
use crate::model::{ExecutionContext, OutputSpec};

/// Trait que define un Step. Implementaciones deben ser puras respecto a
/// inputs + params: la única escritura permitida es su artifact de salida,
/// y de eso se encarga el orquestador.
pub trait StepDefinition: Debug {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Nombres de los artifacts requeridos, en orden estable.
    fn inputs(&self) -> Vec<String>;

    /// Artifact producido.
    fn output(&self) -> OutputSpec;

    /// Parámetros base deterministas. Se fusionan con los overrides del run.
    fn base_params(&self) -> Result<Value, CoreEngineError>;

    /// Valida los params efectivos antes de que el run empiece a ejecutar.
    fn validate_params(&self, _params: &Value) -> Result<(), CoreEngineError> {
        Ok(())
    }

    /// Ejecución pura del step. Debe usar únicamente inputs + params.
    fn run(&self, ctx: &ExecutionContext) -> StepRunResult;
}
