//! Vectorizer de conteo de tokens con IDF opcional.
//!
//! Tokens: secuencias alfanuméricas maximales (opcionalmente en minúsculas).
//! El vocabulario queda ordenado alfabéticamente, así que la columna de cada
//! token es estable entre ejecuciones y procesos.
use std::collections::BTreeMap;

use rayon::prelude::*;
use reco_core::CsrMatrix;
use serde::{Deserialize, Serialize};

use crate::errors::AdapterError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerParams {
    /// Mínimo de documentos en que debe aparecer un token.
    pub min_df: usize,
    /// Conserva los `n` tokens más frecuentes (por document frequency).
    pub max_features: Option<usize>,
    /// Presencia (1.0) en lugar de conteo.
    pub binary: bool,
    pub use_idf: bool,
    pub lowercase: bool,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self { min_df: 1,
               max_features: None,
               binary: false,
               use_idf: true,
               lowercase: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedVectorizer {
    pub lowercase: bool,
    pub binary: bool,
    pub vocabulary: Vec<String>,
    /// Peso por columna; todo `1.0` si no se usa IDF.
    pub idf: Vec<f64>,
    pub documents: usize,
}

pub fn tokenize(text: &str, lowercase: bool) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| if lowercase { t.to_lowercase() } else { t.to_string() })
        .collect()
}

impl VectorizerParams {
    pub fn fit(&self, texts: &[&str]) -> Result<FittedVectorizer, AdapterError> {
        if self.max_features == Some(0) {
            return Err(AdapterError::InvalidDataset("max_features must be positive".into()));
        }
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let mut tokens = tokenize(text, self.lowercase);
            tokens.sort();
            tokens.dedup();
            for t in tokens {
                *df.entry(t).or_default() += 1;
            }
        }
        let min_df = self.min_df.max(1);
        let mut kept: Vec<(String, usize)> = df.into_iter().filter(|(_, n)| *n >= min_df).collect();
        if let Some(max) = self.max_features {
            // más frecuentes primero, empate alfabético
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(max);
            kept.sort_by(|a, b| a.0.cmp(&b.0));
        }
        let n = texts.len() as f64;
        let idf = kept.iter()
                      .map(|(_, d)| if self.use_idf { ((1.0 + n) / (1.0 + *d as f64)).ln() + 1.0 } else { 1.0 })
                      .collect();
        Ok(FittedVectorizer { lowercase: self.lowercase,
                              binary: self.binary,
                              vocabulary: kept.into_iter().map(|(t, _)| t).collect(),
                              idf,
                              documents: texts.len() })
    }
}

impl FittedVectorizer {
    pub fn num_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn column_of(&self, token: &str) -> Option<usize> {
        self.vocabulary.binary_search_by(|t| t.as_str().cmp(token)).ok()
    }

    /// Una fila CSR por texto; tokens fuera del vocabulario se ignoran.
    pub fn transform(&self, texts: &[&str]) -> Result<CsrMatrix, AdapterError> {
        let rows: Vec<Vec<(usize, f64)>> = texts.par_iter()
                                                .map(|text| {
                                                    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                                                    for tok in tokenize(text, self.lowercase) {
                                                        if let Some(col) = self.column_of(&tok) {
                                                            *counts.entry(col).or_default() += 1.0;
                                                        }
                                                    }
                                                    counts.into_iter()
                                                          .map(|(col, c)| {
                                                              let tf = if self.binary { 1.0 } else { c };
                                                              (col, tf * self.idf[col])
                                                          })
                                                          .collect()
                                                })
                                                .collect();
        let triplets = rows.into_iter()
                           .enumerate()
                           .flat_map(|(i, row)| row.into_iter().map(move |(j, v)| (i, j, v)))
                           .collect();
        CsrMatrix::from_triplets(texts.len(), self.num_features(), triplets)
            .map_err(|e| AdapterError::InvalidDataset(e.to_string()))
    }
}

/// Normaliza cada fila a norma L2 unitaria; las filas nulas quedan igual.
pub fn l2_normalize(m: &CsrMatrix) -> Result<CsrMatrix, AdapterError> {
    let mut values = m.values().to_vec();
    for i in 0..m.rows() {
        let (start, end) = (m.indptr()[i], m.indptr()[i + 1]);
        let norm = values[start..end].iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            values[start..end].iter_mut().for_each(|v| *v /= norm);
        }
    }
    CsrMatrix::new(m.rows(), m.cols(), m.indptr().to_vec(), m.indices().to_vec(), values)
        .map_err(|e| AdapterError::InvalidDataset(e.to_string()))
}
