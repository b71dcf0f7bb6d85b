//! Ensamblado del pipeline por defecto y lectura del resultado.
use reco_core::{ArtifactStore, CoreEngineError, NumericArray, Orchestrator, RunOutcome};
use reco_domain::SimilarityRecommender;

use crate::artifacts::{RawDataset, RAW_DATA, SIMILARITY};
use crate::errors::AdapterError;
use crate::source::DataSource;
use crate::steps::{FeatureParams, FitVectorizerStep, GenerateFeaturesStep, GenerateSimilarityStep, LoadDataStep,
                   SimilarityParams};
use crate::vectorizer::VectorizerParams;

/// Configuración base de los steps; un `RunConfig` puede sobreescribirla por run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub vectorizer: VectorizerParams,
    pub features: FeatureParams,
    pub similarity: SimilarityParams,
}

/// load_data -> fit_vectorizer -> generate_features -> generate_similarity.
pub fn default_pipeline<S>(source: impl DataSource + 'static,
                           store: S,
                           options: PipelineOptions)
                           -> Result<Orchestrator<S>, CoreEngineError>
    where S: ArtifactStore
{
    Orchestrator::new(store).first_step(LoadDataStep::new(source))
                            .add_step(FitVectorizerStep::new(options.vectorizer))
                            .add_step(GenerateFeaturesStep::new(options.features))
                            .add_step(GenerateSimilarityStep::new(options.similarity))
                            .build()
}

/// Recomendador sobre la matriz de similitud de un run, indexado por los ids
/// del dataset en orden de carga.
pub fn recommender_from_outcome(outcome: &RunOutcome) -> Result<SimilarityRecommender, AdapterError> {
    let missing = |name: &str| CoreEngineError::Internal(format!("run produced no '{name}' artifact"));
    let raw = outcome.artifact(RAW_DATA).ok_or_else(|| missing(RAW_DATA))?;
    let table = raw.value.as_table().ok_or_else(|| AdapterError::InvalidDataset("raw data is not a table".into()))?;
    let index = RawDataset::from_table(table)?.id_index()?;

    let similarity = outcome.artifact(SIMILARITY).ok_or_else(|| missing(SIMILARITY))?;
    let matrix = match similarity.value.as_array() {
        Some(NumericArray::Dense(m)) => m.clone(),
        Some(NumericArray::Sparse(m)) => m.to_dense(),
        None => return Err(AdapterError::InvalidDataset("similarity is not a numeric array".into())),
    };
    Ok(SimilarityRecommender::from_matrix(index, matrix)?)
}
