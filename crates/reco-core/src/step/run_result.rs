use crate::{errors::CoreEngineError, model::ArtifactValue};

/// Resultado abstracto de ejecutar un step.
pub enum StepRunResult {
    Success { output: ArtifactValue },
    Failure { error: CoreEngineError },
}

impl From<Result<ArtifactValue, CoreEngineError>> for StepRunResult {
    fn from(res: Result<ArtifactValue, CoreEngineError>) -> Self {
        match res {
            Ok(output) => Self::Success { output },
            Err(error) => Self::Failure { error },
        }
    }
}
