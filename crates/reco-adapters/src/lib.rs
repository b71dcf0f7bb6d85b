//! reco-adapters: colaboradores concretos y pipeline de recomendación.
//!
//! Este crate provee:
//! - `DataSource` (inline y archivo JSON) y el dataset crudo como tabla.
//! - `VectorizerParams`/`FittedVectorizer`: conteo de tokens con IDF.
//! - Los steps `LoadDataStep`, `FitVectorizerStep`, `GenerateFeaturesStep`
//!   y `GenerateSimilarityStep`.
//! - `default_pipeline` y `recommender_from_outcome`.
//!
//! El core no conoce nada de esto: sólo ve steps, artifacts y fingerprints.

pub mod artifacts;
pub mod errors;
pub mod pipeline;
pub mod source;
pub mod steps;
pub mod vectorizer;

pub use artifacts::{RawDataset, RawRecord};
pub use errors::AdapterError;
pub use pipeline::{default_pipeline, recommender_from_outcome, PipelineOptions};
pub use source::{DataSource, InlineDataSource, JsonFileSource};
pub use vectorizer::{FittedVectorizer, VectorizerParams};
