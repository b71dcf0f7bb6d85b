//! Estrategias de similitud.
//!
//! `SimilarityStrategy` es una unión etiquetada: la variante se elige por
//! configuración (`{"kind": "cosine"}`) y se despacha desde un único punto
//! (`score`). Todas las variantes son deterministas, no mutan sus inputs y
//! aceptan matrices densas o dispersas indistintamente.
//!
//! Convenciones para casos degenerados:
//! - Cosine: un vector cero tiene similitud `0.0` con cualquier otro (nunca NaN).
//! - Jaccard: dos filas sin columnas no nulas tienen similitud `0.0`.
use rayon::prelude::*;
use reco_core::DenseMatrix;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::features::{row, FeatureMatrix, RowView};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimilarityStrategy {
    #[default]
    Cosine,
    DotProduct,
    Jaccard,
    /// `1 / (1 + distancia euclídea)`, en `(0, 1]`.
    Euclidean,
}

/// Datos por fila que se precalculan una vez por matriz.
struct Prepared<'a> {
    rows: Vec<RowView<'a>>,
    sq_norms: Vec<f64>,
    nonzero: Vec<Vec<usize>>,
}

impl SimilarityStrategy {
    /// Nombre corto aceptado por la CLI y la configuración.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" | "dot_product" => Ok(Self::DotProduct),
            "jaccard" => Ok(Self::Jaccard),
            "euclidean" => Ok(Self::Euclidean),
            other => Err(DomainError::InvalidArgument(format!("unknown similarity strategy '{other}'"))),
        }
    }

    /// Rango de valores posibles (mínimo, máximo), si está acotado.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Cosine => Some((-1.0, 1.0)),
            Self::Jaccard | Self::Euclidean => Some((0.0, 1.0)),
            Self::DotProduct => None,
        }
    }

    /// Similitud de todas las filas de `features` contra sí mismas.
    /// El resultado es cuadrado y exactamente simétrico.
    pub fn compute(&self, features: &FeatureMatrix) -> DenseMatrix {
        let n = features.rows();
        let prepared = self.prepare(features);
        // sólo el triángulo superior; el inferior se refleja
        let upper: Vec<Vec<f64>> = (0..n).into_par_iter()
                                         .map(|i| (i..n).map(|j| self.score(&prepared, i, &prepared, j)).collect())
                                         .collect();
        let mut out = DenseMatrix::zeros(n, n);
        for (i, tail) in upper.into_iter().enumerate() {
            for (off, v) in tail.into_iter().enumerate() {
                let j = i + off;
                out.set(i, j, v);
                out.set(j, i, v);
            }
        }
        out
    }

    /// Similitud de cada fila de `a` contra cada fila de `b`; forma `(rows(a), rows(b))`.
    pub fn compute_pairwise(&self, a: &FeatureMatrix, b: &FeatureMatrix) -> Result<DenseMatrix, DomainError> {
        if a.cols() != b.cols() {
            return Err(DomainError::InvalidArgument(format!("feature dimensions differ: {} vs {}", a.cols(), b.cols())));
        }
        let (pa, pb) = (self.prepare(a), self.prepare(b));
        let data: Vec<f64> = (0..a.rows()).into_par_iter()
                                          .flat_map_iter(|i| {
                                              let (pa, pb) = (&pa, &pb);
                                              (0..b.rows()).map(move |j| self.score(pa, i, pb, j))
                                          })
                                          .collect();
        Ok(DenseMatrix::new(a.rows(), b.rows(), data)?)
    }

    fn prepare<'a>(&self, m: &'a FeatureMatrix) -> Prepared<'a> {
        let rows: Vec<RowView<'a>> = (0..m.rows()).map(|i| row(m, i)).collect();
        let sq_norms = rows.iter().map(RowView::squared_norm).collect();
        let nonzero = match self {
            Self::Jaccard => rows.iter().map(RowView::nonzero_columns).collect(),
            _ => Vec::new(),
        };
        Prepared { rows, sq_norms, nonzero }
    }

    fn score(&self, a: &Prepared<'_>, i: usize, b: &Prepared<'_>, j: usize) -> f64 {
        match self {
            Self::Cosine => {
                let denom = (a.sq_norms[i] * b.sq_norms[j]).sqrt();
                if denom == 0.0 {
                    0.0
                } else {
                    (a.rows[i].dot(&b.rows[j]) / denom).clamp(-1.0, 1.0)
                }
            }
            Self::DotProduct => a.rows[i].dot(&b.rows[j]),
            Self::Jaccard => jaccard(&a.nonzero[i], &b.nonzero[j]),
            Self::Euclidean => {
                let sq = (a.sq_norms[i] + b.sq_norms[j] - 2.0 * a.rows[i].dot(&b.rows[j])).max(0.0);
                1.0 / (1.0 + sq.sqrt())
            }
        }
    }
}

fn jaccard(a: &[usize], b: &[usize]) -> f64 {
    let (mut p, mut q, mut inter) = (0usize, 0usize, 0usize);
    while p < a.len() && q < b.len() {
        match a[p].cmp(&b[q]) {
            std::cmp::Ordering::Less => p += 1,
            std::cmp::Ordering::Greater => q += 1,
            std::cmp::Ordering::Equal => {
                inter += 1;
                p += 1;
                q += 1;
            }
        }
    }
    let union = a.len() + b.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reco_core::{CsrMatrix, NumericArray};

    fn dense(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        NumericArray::Dense(DenseMatrix::from_rows(rows).unwrap())
    }

    #[test]
    fn cosine_zero_vector_is_zero_not_nan() {
        let f = dense(vec![vec![0.0, 0.0], vec![1.0, 2.0]]);
        let m = SimilarityStrategy::Cosine.compute(&f);
        assert_eq!(m.get(0, 1), Some(0.0));
        assert_eq!(m.get(0, 0), Some(0.0));
        assert!(m.data().iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn cosine_of_parallel_and_opposite_vectors() {
        let f = dense(vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![-1.0, -1.0]]);
        let m = SimilarityStrategy::Cosine.compute(&f);
        assert!((m.get(0, 1).unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get(0, 2).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn jaccard_uses_nonzero_sets() {
        let f = dense(vec![vec![1.0, 5.0, 0.0], vec![2.0, 0.0, 3.0], vec![0.0, 0.0, 0.0]]);
        let m = SimilarityStrategy::Jaccard.compute(&f);
        assert!((m.get(0, 1).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.get(2, 2), Some(0.0));
    }

    #[test]
    fn euclidean_identity_scores_one() {
        let f = dense(vec![vec![3.0, 4.0], vec![0.0, 0.0]]);
        let m = SimilarityStrategy::Euclidean.compute(&f);
        assert!((m.get(0, 0).unwrap() - 1.0).abs() < 1e-9);
        assert!((m.get(0, 1).unwrap() - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn dot_product_is_raw() {
        let f = dense(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(SimilarityStrategy::DotProduct.compute(&f).get(0, 1), Some(11.0));
    }

    #[test]
    fn pairwise_rejects_different_dimensions() {
        let a = dense(vec![vec![1.0, 2.0]]);
        let b = NumericArray::Sparse(CsrMatrix::empty(2, 3));
        assert!(matches!(SimilarityStrategy::Cosine.compute_pairwise(&a, &b),
                         Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn strategy_config_is_tagged() {
        let s: SimilarityStrategy = serde_json::from_value(serde_json::json!({"kind": "jaccard"})).unwrap();
        assert_eq!(s, SimilarityStrategy::Jaccard);
        assert_eq!(serde_json::to_value(SimilarityStrategy::DotProduct).unwrap(),
                   serde_json::json!({"kind": "dot_product"}));
        assert_eq!(SimilarityStrategy::parse("Dot"), Ok(SimilarityStrategy::DotProduct));
        assert!(SimilarityStrategy::parse("manhattan").is_err());
    }
}
