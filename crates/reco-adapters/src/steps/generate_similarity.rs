use log::debug;
use reco_core::model::ExecutionContext;
use reco_core::{ArtifactFormat, ArtifactValue, CoreEngineError, NumericArray, OutputSpec, TypedStep};
use reco_domain::SimilarityStrategy;
use serde::{Deserialize, Serialize};

use super::{array_input, GENERATE_SIMILARITY};
use crate::artifacts::{FEATURES, SIMILARITY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityParams {
    pub strategy: SimilarityStrategy,
}

/// Matriz de similitud densa entidad x entidad.
#[derive(Debug, Clone, Default)]
pub struct GenerateSimilarityStep {
    params: SimilarityParams,
}

impl GenerateSimilarityStep {
    pub fn new(params: SimilarityParams) -> Self {
        Self { params }
    }

    pub fn with_strategy(strategy: SimilarityStrategy) -> Self {
        Self::new(SimilarityParams { strategy })
    }
}

impl TypedStep for GenerateSimilarityStep {
    type Params = SimilarityParams;

    fn id(&self) -> &'static str {
        GENERATE_SIMILARITY
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[FEATURES]
    }

    fn output(&self) -> OutputSpec {
        OutputSpec::new(SIMILARITY, ArtifactFormat::Array)
    }

    fn params(&self) -> SimilarityParams {
        self.params.clone()
    }

    fn run_typed(&self, ctx: &ExecutionContext, params: SimilarityParams) -> Result<ArtifactValue, CoreEngineError> {
        let features = array_input(ctx, FEATURES)?;
        debug!("similarity {:?} over {}x{} features",
               params.strategy,
               features.rows(),
               features.cols());
        Ok(ArtifactValue::Array(NumericArray::Dense(params.strategy.compute(features))))
    }
}
