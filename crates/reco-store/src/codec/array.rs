//! Codec de matrices numéricas.
//!
//! Formato: `RFNA` + versión (u8) + tipo (u8: 0 densa, 1 CSR) + bincode de
//! las partes crudas. El byte de tipo permite detectar al cargar qué se
//! guardó sin ambigüedad; las partes se revalidan con los constructores.
use reco_core::{ArtifactFormat, ArtifactValue, CsrMatrix, DenseMatrix, NumericArray};
use serde::{Deserialize, Serialize};

use super::{read_header, write_header, wrong_kind, Codec};
use crate::error::StoreError;

const MAGIC: &[u8; 4] = b"RFNA";
const VERSION: u8 = 1;
const KIND_DENSE: u8 = 0;
const KIND_SPARSE: u8 = 1;

#[derive(Serialize, Deserialize)]
struct DenseParts {
    rows: u64,
    cols: u64,
    data: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct SparseParts {
    rows: u64,
    cols: u64,
    indptr: Vec<u64>,
    indices: Vec<u64>,
    values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayCodec;

impl Codec for ArrayCodec {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Array
    }

    fn encode(&self, value: &ArtifactValue) -> Result<Vec<u8>, StoreError> {
        let ArtifactValue::Array(array) = value else {
            return Err(wrong_kind(self.format(), value));
        };
        let mut out = Vec::new();
        write_header(&mut out, MAGIC, VERSION);
        let body = match array {
            NumericArray::Dense(m) => {
                out.push(KIND_DENSE);
                bincode::serialize(&DenseParts { rows: m.rows() as u64,
                                                 cols: m.cols() as u64,
                                                 data: m.data().to_vec() })
            }
            NumericArray::Sparse(m) => {
                out.push(KIND_SPARSE);
                bincode::serialize(&SparseParts { rows: m.rows() as u64,
                                                  cols: m.cols() as u64,
                                                  indptr: m.indptr().iter().map(|&p| p as u64).collect(),
                                                  indices: m.indices().iter().map(|&c| c as u64).collect(),
                                                  values: m.values().to_vec() })
            }
        }.map_err(|e| StoreError::Serialization(format!("array: {e}")))?;
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArtifactValue, StoreError> {
        let rest = read_header(bytes, MAGIC, VERSION)?;
        let Some((&kind, body)) = rest.split_first() else {
            return Err(StoreError::Corrupt("array payload truncated".into()));
        };
        let corrupt = |e: String| StoreError::Corrupt(format!("array: {e}"));
        let array = match kind {
            KIND_DENSE => {
                let p: DenseParts = bincode::deserialize(body).map_err(|e| corrupt(e.to_string()))?;
                NumericArray::Dense(DenseMatrix::new(p.rows as usize, p.cols as usize, p.data).map_err(|e| corrupt(e.to_string()))?)
            }
            KIND_SPARSE => {
                let p: SparseParts = bincode::deserialize(body).map_err(|e| corrupt(e.to_string()))?;
                let m = CsrMatrix::new(p.rows as usize,
                                       p.cols as usize,
                                       p.indptr.into_iter().map(|x| x as usize).collect(),
                                       p.indices.into_iter().map(|x| x as usize).collect(),
                                       p.values).map_err(|e| corrupt(e.to_string()))?;
                NumericArray::Sparse(m)
            }
            other => return Err(corrupt(format!("unknown array kind {other}"))),
        };
        Ok(ArtifactValue::Array(array))
    }
}
