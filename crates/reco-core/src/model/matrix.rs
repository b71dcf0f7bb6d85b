//! Matrices numéricas neutrales: densa (row-major) y dispersa (CSR).
//!
//! Son el contenido de los artifacts de formato `Array` (matriz de features,
//! matriz de similitud). El core no interpreta filas ni columnas.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid matrix shape: {0}")]
pub struct ShapeError(pub String);

/// Matriz densa `rows x cols` en orden row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ShapeError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(ShapeError(format!("{rows}x{cols} needs {} values, got {}", rows.saturating_mul(cols), data.len())));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows,
               cols,
               data: vec![0.0; rows * cols] }
    }

    /// Construye desde filas; todas deben tener la misma longitud.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let n = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(n * cols);
        for (i, r) in rows.into_iter().enumerate() {
            if r.len() != cols {
                return Err(ShapeError(format!("row {i} has {} columns, expected {cols}", r.len())));
            }
            data.extend(r);
        }
        Ok(Self { rows: n, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            self.data.get(i * self.cols + j).copied()
        } else {
            None
        }
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i < self.rows && j < self.cols {
            self.data[i * self.cols + j] = value;
        }
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Matriz dispersa en formato CSR (compressed sparse row).
///
/// Invariantes: `indptr.len() == rows + 1`, `indptr` no decreciente,
/// `indices` ordenados y sin duplicados dentro de cada fila, `< cols`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    pub fn new(rows: usize,
               cols: usize,
               indptr: Vec<usize>,
               indices: Vec<usize>,
               values: Vec<f64>)
               -> Result<Self, ShapeError> {
        if indptr.len() != rows + 1 {
            return Err(ShapeError(format!("indptr must have {} entries, got {}", rows + 1, indptr.len())));
        }
        if indices.len() != values.len() || indptr.last().copied() != Some(indices.len()) || indptr[0] != 0 {
            return Err(ShapeError("indptr/indices/values lengths disagree".into()));
        }
        for r in 0..rows {
            let (start, end) = (indptr[r], indptr[r + 1]);
            if start > end {
                return Err(ShapeError(format!("indptr decreases at row {r}")));
            }
            let row = &indices[start..end];
            if row.iter().any(|&c| c >= cols) {
                return Err(ShapeError(format!("column index out of bounds in row {r}")));
            }
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ShapeError(format!("row {r} indices not strictly increasing")));
            }
        }
        Ok(Self { rows,
                  cols,
                  indptr,
                  indices,
                  values })
    }

    /// Matriz sin valores almacenados.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self { rows,
               cols,
               indptr: vec![0; rows + 1],
               indices: Vec::new(),
               values: Vec::new() }
    }

    /// Construye desde tripletas `(fila, columna, valor)`; duplicados se suman.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Result<Self, ShapeError> {
        if let Some(&(r, c, _)) = triplets.iter().find(|(r, c, _)| *r >= rows || *c >= cols) {
            return Err(ShapeError(format!("entry ({r}, {c}) outside {rows}x{cols}")));
        }
        triplets.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let mut indptr = vec![0usize; rows + 1];
        let mut indices: Vec<usize> = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut last: Option<(usize, usize)> = None;
        for (r, c, v) in triplets {
            if last == Some((r, c)) {
                if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
                continue;
            }
            indices.push(c);
            values.push(v);
            indptr[r + 1] += 1;
            last = Some((r, c));
        }
        for r in 0..rows {
            indptr[r + 1] += indptr[r];
        }
        Ok(Self { rows,
                  cols,
                  indptr,
                  indices,
                  values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Índices de columna y valores almacenados de la fila `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        (&self.indices[start..end], &self.values[start..end])
    }

    pub fn to_dense(&self) -> DenseMatrix {
        let mut out = DenseMatrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            let (idx, vals) = self.row(i);
            for (&j, &v) in idx.iter().zip(vals) {
                out.set(i, j, v);
            }
        }
        out
    }
}

/// Matriz de features o de similitud, densa o dispersa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumericArray {
    Dense(DenseMatrix),
    Sparse(CsrMatrix),
}

impl NumericArray {
    pub fn rows(&self) -> usize {
        match self {
            Self::Dense(m) => m.rows(),
            Self::Sparse(m) => m.rows(),
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            Self::Dense(m) => m.cols(),
            Self::Sparse(m) => m.cols(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplets_are_sorted_and_duplicates_summed() {
        let m = CsrMatrix::from_triplets(2, 3, vec![(1, 2, 1.0), (0, 1, 2.0), (1, 0, 3.0), (1, 2, 0.5)]).unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0), (&[1usize][..], &[2.0][..]));
        assert_eq!(m.row(1), (&[0usize, 2][..], &[3.0, 1.5][..]));
        assert_eq!(m.to_dense().row(1), &[3.0, 0.0, 1.5]);
    }

    #[test]
    fn invalid_csr_is_rejected() {
        assert!(CsrMatrix::new(1, 2, vec![0, 2], vec![1, 0], vec![1.0, 1.0]).is_err());
        assert!(CsrMatrix::new(1, 2, vec![0, 1], vec![5], vec![1.0]).is_err());
        assert!(CsrMatrix::from_triplets(1, 1, vec![(0, 1, 1.0)]).is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(DenseMatrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
        let empty = DenseMatrix::from_rows(vec![]).unwrap();
        assert_eq!(empty.shape(), (0, 0));
    }
}
