use reco_core::model::ExecutionContext;
use reco_core::{ArtifactFormat, ArtifactValue, CoreEngineError, OutputSpec, TypedStep};

use super::{dataset_input, FIT_VECTORIZER};
use crate::artifacts::{RAW_DATA, VECTORIZER};
use crate::vectorizer::VectorizerParams;

/// Ajusta el vocabulario sobre los textos del dataset; el vectorizer
/// entrenado se guarda como objeto binario.
#[derive(Debug, Clone, Default)]
pub struct FitVectorizerStep {
    params: VectorizerParams,
}

impl FitVectorizerStep {
    pub fn new(params: VectorizerParams) -> Self {
        Self { params }
    }
}

impl TypedStep for FitVectorizerStep {
    type Params = VectorizerParams;

    fn id(&self) -> &'static str {
        FIT_VECTORIZER
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[RAW_DATA]
    }

    fn output(&self) -> OutputSpec {
        OutputSpec::new(VECTORIZER, ArtifactFormat::Binary)
    }

    fn params(&self) -> VectorizerParams {
        self.params.clone()
    }

    fn run_typed(&self, ctx: &ExecutionContext, params: VectorizerParams) -> Result<ArtifactValue, CoreEngineError> {
        let dataset = dataset_input(ctx, RAW_DATA)?;
        let fitted = params.fit(&dataset.texts())?;
        ArtifactValue::from_object(&fitted)
    }
}
