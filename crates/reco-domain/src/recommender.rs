//! Top-k sobre una matriz de similitud.
//!
//! Orden total de resultados: score descendente y, en empate, id ascendente.
//! Un score NaN nunca precede a uno numérico. La propia entidad consultada
//! queda siempre fuera de su lista, sea cual sea su auto-similitud.
use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use reco_core::DenseMatrix;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::features::FeatureMatrix;
use crate::index::IdIndex;
use crate::similarity::SimilarityStrategy;

pub const DEFAULT_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub score: f64,
}

/// Resultado por id de un batch; los errores se reportan en línea.
pub type BatchResult = IndexMap<i64, Result<Vec<Recommendation>, DomainError>>;

pub trait Recommender {
    fn recommend(&self, id: i64, k: usize) -> Result<Vec<Recommendation>, DomainError>;

    /// Equivale a llamar `recommend` por cada id. Sólo un `k` inválido hace
    /// fallar el batch completo; ids repetidos se responden una vez, en el
    /// orden de su primera aparición.
    fn recommend_batch(&self, ids: &[i64], k: usize) -> Result<BatchResult, DomainError>
        where Self: Sync
    {
        check_k(k)?;
        let unique: Vec<i64> = ids.iter().copied().collect::<IndexSet<i64>>().into_iter().collect();
        let results: Vec<_> = unique.par_iter().map(|&id| (id, self.recommend(id, k))).collect();
        Ok(results.into_iter().collect())
    }
}

fn check_k(k: usize) -> Result<(), DomainError> {
    if k == 0 {
        return Err(DomainError::InvalidArgument("k must be a positive integer".to_string()));
    }
    Ok(())
}

/// Recomendador respaldado por una matriz de similitud, precalculada o
/// calculada una sola vez a partir de features en la primera consulta.
#[derive(Debug)]
pub struct SimilarityRecommender {
    rows: IdIndex,
    cols: IdIndex,
    matrix: OnceCell<DenseMatrix>,
    source: Option<(FeatureMatrix, SimilarityStrategy)>,
}

impl SimilarityRecommender {
    /// Matriz cuadrada cuyas filas y columnas siguen el mismo índice.
    pub fn from_matrix(index: IdIndex, matrix: DenseMatrix) -> Result<Self, DomainError> {
        if matrix.shape() != (index.len(), index.len()) {
            return Err(DomainError::ShapeMismatch(format!("similarity matrix is {}x{} but index has {} ids",
                                                          matrix.rows(),
                                                          matrix.cols(),
                                                          index.len())));
        }
        Ok(Self { cols: index.clone(),
                  rows: index,
                  matrix: OnceCell::with_value(matrix),
                  source: None })
    }

    /// Consultas cruzadas: filas (consultas) y columnas (candidatos) con índices distintos.
    pub fn cross(rows: IdIndex, cols: IdIndex, matrix: DenseMatrix) -> Result<Self, DomainError> {
        if matrix.shape() != (rows.len(), cols.len()) {
            return Err(DomainError::ShapeMismatch(format!("similarity matrix is {}x{} but indices are {}x{}",
                                                          matrix.rows(),
                                                          matrix.cols(),
                                                          rows.len(),
                                                          cols.len())));
        }
        Ok(Self { rows,
                  cols,
                  matrix: OnceCell::with_value(matrix),
                  source: None })
    }

    /// La matriz se calcula con `strategy` en la primera consulta.
    pub fn lazy(index: IdIndex, features: FeatureMatrix, strategy: SimilarityStrategy) -> Result<Self, DomainError> {
        if features.rows() != index.len() {
            return Err(DomainError::ShapeMismatch(format!("feature matrix has {} rows but index has {} ids",
                                                          features.rows(),
                                                          index.len())));
        }
        Ok(Self { cols: index.clone(),
                  rows: index,
                  matrix: OnceCell::new(),
                  source: Some((features, strategy)) })
    }

    pub fn index(&self) -> &IdIndex {
        &self.rows
    }

    pub fn matrix(&self) -> &DenseMatrix {
        self.matrix.get_or_init(|| match &self.source {
                       Some((features, strategy)) => {
                           debug!("computing {:?} similarity for {} entities", strategy, features.rows());
                           strategy.compute(features)
                       }
                       None => DenseMatrix::zeros(self.rows.len(), self.cols.len()),
                   })
    }
}

impl Recommender for SimilarityRecommender {
    fn recommend(&self, id: i64, k: usize) -> Result<Vec<Recommendation>, DomainError> {
        check_k(k)?;
        let i = self.rows.row_of(id)?;
        let scores = self.matrix().row(i);
        let mut out: Vec<Recommendation> = self.cols
                                               .ids()
                                               .iter()
                                               .zip(scores.iter())
                                               .filter(|&(&cid, _)| cid != id)
                                               .map(|(&cid, &score)| Recommendation { id: cid, score })
                                               .collect();
        out.sort_by(rank);
        out.truncate(k);
        Ok(out)
    }
}

fn rank(a: &Recommendation, b: &Recommendation) -> Ordering {
    let by_score = match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    };
    by_score.then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reco_core::NumericArray;

    fn scenario() -> SimilarityRecommender {
        let index = IdIndex::from_ids([1, 2, 3]).unwrap();
        let features = NumericArray::Dense(DenseMatrix::from_rows(vec![vec![1.0, 0.0],
                                                                       vec![1.0, 0.0],
                                                                       vec![0.0, 1.0]]).unwrap());
        SimilarityRecommender::lazy(index, features, SimilarityStrategy::Cosine).unwrap()
    }

    #[test]
    fn identical_rows_rank_first_and_self_is_excluded() {
        let got = scenario().recommend(1, 2).unwrap();
        assert_eq!(got,
                   vec![Recommendation { id: 2, score: 1.0 }, Recommendation { id: 3, score: 0.0 }]);
    }

    #[test]
    fn unknown_id_and_zero_k_are_errors() {
        let r = scenario();
        assert_eq!(r.recommend(99, 5), Err(DomainError::UnknownEntity(99)));
        assert!(matches!(r.recommend(1, 0), Err(DomainError::InvalidArgument(_))));
        assert!(matches!(r.recommend_batch(&[1], 0), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn k_larger_than_candidates_returns_all() {
        assert_eq!(scenario().recommend(3, 50).unwrap().len(), 2);
    }

    #[test]
    fn ties_break_by_ascending_id_and_nan_goes_last() {
        let index = IdIndex::from_ids([5, 9, 2, 7]).unwrap();
        let m = DenseMatrix::from_rows(vec![vec![1.0, 0.5, 0.5, f64::NAN],
                                            vec![0.5, 1.0, 0.1, 0.1],
                                            vec![0.5, 0.1, 1.0, 0.1],
                                            vec![f64::NAN, 0.1, 0.1, 1.0]]).unwrap();
        let r = SimilarityRecommender::from_matrix(index, m).unwrap();
        let ids: Vec<i64> = r.recommend(5, 3).unwrap().iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![2, 9, 7]);
    }

    #[test]
    fn self_excluded_even_when_not_the_max() {
        let index = IdIndex::from_ids([1, 2]).unwrap();
        let m = DenseMatrix::from_rows(vec![vec![0.0, 0.3], vec![0.3, 0.0]]).unwrap();
        let r = SimilarityRecommender::from_matrix(index, m).unwrap();
        assert_eq!(r.recommend(1, 10).unwrap(), vec![Recommendation { id: 2, score: 0.3 }]);
    }

    #[test]
    fn batch_matches_single_calls_with_partial_failure() {
        let r = scenario();
        let batch = r.recommend_batch(&[3, 99, 1, 3], 1).unwrap();
        assert_eq!(batch.keys().copied().collect::<Vec<_>>(), vec![3, 99, 1]);
        assert_eq!(batch[&3], r.recommend(3, 1));
        assert_eq!(batch[&1], r.recommend(1, 1));
        assert_eq!(batch[&99], Err(DomainError::UnknownEntity(99)));
    }

    #[test]
    fn large_batch_with_repeats_keeps_first_seen_order() {
        let r = scenario();
        let ids: Vec<i64> = (0..50_000).map(|i| [2, 1, 2, 3][i % 4]).collect();
        let batch = r.recommend_batch(&ids, 1).unwrap();
        assert_eq!(batch.keys().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn matrix_shape_must_match_index() {
        let index = IdIndex::from_ids([1, 2]).unwrap();
        let m = DenseMatrix::zeros(3, 3);
        assert!(matches!(SimilarityRecommender::from_matrix(index, m), Err(DomainError::ShapeMismatch(_))));
    }

    #[test]
    fn cross_queries_use_column_ids() {
        let rows = IdIndex::from_ids([100]).unwrap();
        let cols = IdIndex::from_ids([1, 2, 100]).unwrap();
        let m = DenseMatrix::from_rows(vec![vec![0.2, 0.9, 1.0]]).unwrap();
        let r = SimilarityRecommender::cross(rows, cols, m).unwrap();
        let ids: Vec<i64> = r.recommend(100, 5).unwrap().iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
