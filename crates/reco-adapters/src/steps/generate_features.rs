use reco_core::model::ExecutionContext;
use reco_core::{ArtifactFormat, ArtifactValue, CoreEngineError, NumericArray, OutputSpec, TypedStep};
use serde::{Deserialize, Serialize};

use super::{dataset_input, GENERATE_FEATURES};
use crate::artifacts::{FEATURES, RAW_DATA, VECTORIZER};
use crate::vectorizer::{l2_normalize, FittedVectorizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    /// Filas con norma L2 unitaria.
    pub normalize: bool,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self { normalize: true }
    }
}

/// Matriz de features dispersa (una fila por registro, en orden de carga).
#[derive(Debug, Clone, Default)]
pub struct GenerateFeaturesStep {
    params: FeatureParams,
}

impl GenerateFeaturesStep {
    pub fn new(params: FeatureParams) -> Self {
        Self { params }
    }
}

impl TypedStep for GenerateFeaturesStep {
    type Params = FeatureParams;

    fn id(&self) -> &'static str {
        GENERATE_FEATURES
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[RAW_DATA, VECTORIZER]
    }

    fn output(&self) -> OutputSpec {
        OutputSpec::new(FEATURES, ArtifactFormat::Array)
    }

    fn params(&self) -> FeatureParams {
        self.params.clone()
    }

    fn run_typed(&self, ctx: &ExecutionContext, params: FeatureParams) -> Result<ArtifactValue, CoreEngineError> {
        let dataset = dataset_input(ctx, RAW_DATA)?;
        let vectorizer: FittedVectorizer = ctx.input(VECTORIZER)?.value.to_object()?;
        let mut features = vectorizer.transform(&dataset.texts())?;
        if params.normalize {
            features = l2_normalize(&features)?;
        }
        Ok(ArtifactValue::Array(NumericArray::Sparse(features)))
    }
}
