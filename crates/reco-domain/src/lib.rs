//! reco-domain: similitud entre entidades y recomendación top-k.
pub mod errors;
pub mod features;
pub mod index;
pub mod recommender;
pub mod similarity;

pub use errors::DomainError;
pub use features::{row, FeatureMatrix, RowView};
pub use index::IdIndex;
pub use recommender::{BatchResult, Recommendation, Recommender, SimilarityRecommender, DEFAULT_K};
pub use similarity::SimilarityStrategy;
