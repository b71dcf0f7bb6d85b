//! Los cuatro steps del pipeline de recomendación:
//! load_data -> fit_vectorizer -> generate_features -> generate_similarity.
pub mod fit_vectorizer;
pub mod generate_features;
pub mod generate_similarity;
pub mod load_data;

pub use fit_vectorizer::FitVectorizerStep;
pub use generate_features::{FeatureParams, GenerateFeaturesStep};
pub use generate_similarity::{GenerateSimilarityStep, SimilarityParams};
pub use load_data::LoadDataStep;

use reco_core::model::ExecutionContext;
use reco_core::{ArtifactFormat, ArtifactFormatError, CoreEngineError, NumericArray};

use crate::artifacts::RawDataset;

pub const LOAD_DATA: &str = "load_data";
pub const FIT_VECTORIZER: &str = "fit_vectorizer";
pub const GENERATE_FEATURES: &str = "generate_features";
pub const GENERATE_SIMILARITY: &str = "generate_similarity";

pub(crate) fn dataset_input(ctx: &ExecutionContext, name: &str) -> Result<RawDataset, CoreEngineError> {
    let artifact = ctx.input(name)?;
    let table = artifact.value.as_table().ok_or_else(|| ArtifactFormatError { format: ArtifactFormat::Table,
                                                                               found: artifact.value
                                                                                              .kind_name()
                                                                                              .to_string() })?;
    Ok(RawDataset::from_table(table)?)
}

pub(crate) fn array_input<'a>(ctx: &'a ExecutionContext, name: &str) -> Result<&'a NumericArray, CoreEngineError> {
    let artifact = ctx.input(name)?;
    Ok(artifact.value.as_array().ok_or_else(|| ArtifactFormatError { format: ArtifactFormat::Array,
                                                                      found: artifact.value.kind_name().to_string() })?)
}
