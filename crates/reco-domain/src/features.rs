//! Vista por filas de una matriz de features (densa o CSR) y operaciones
//! vectoriales básicas sobre filas de cualquier combinación de formatos.
use reco_core::NumericArray;

/// Una matriz de features: filas = entidades, columnas = features.
pub type FeatureMatrix = NumericArray;

#[derive(Debug, Clone, Copy)]
pub enum RowView<'a> {
    Dense(&'a [f64]),
    Sparse { indices: &'a [usize], values: &'a [f64] },
}

/// Fila `i` sin copiar datos.
pub fn row(m: &FeatureMatrix, i: usize) -> RowView<'_> {
    match m {
        NumericArray::Dense(d) => RowView::Dense(d.row(i)),
        NumericArray::Sparse(s) => {
            let (indices, values) = s.row(i);
            RowView::Sparse { indices, values }
        }
    }
}

impl RowView<'_> {
    pub fn dot(&self, other: &RowView<'_>) -> f64 {
        match (self, other) {
            (RowView::Dense(a), RowView::Dense(b)) => a.iter().zip(b.iter()).map(|(x, y)| x * y).sum(),
            (RowView::Sparse { indices, values }, RowView::Dense(d))
            | (RowView::Dense(d), RowView::Sparse { indices, values }) => {
                indices.iter().zip(values.iter()).map(|(&j, v)| v * d.get(j).copied().unwrap_or(0.0)).sum()
            }
            (RowView::Sparse { indices: ia, values: va }, RowView::Sparse { indices: ib, values: vb }) => {
                // merge de índices ordenados
                let (mut p, mut q, mut acc) = (0usize, 0usize, 0.0);
                while p < ia.len() && q < ib.len() {
                    match ia[p].cmp(&ib[q]) {
                        std::cmp::Ordering::Less => p += 1,
                        std::cmp::Ordering::Greater => q += 1,
                        std::cmp::Ordering::Equal => {
                            acc += va[p] * vb[q];
                            p += 1;
                            q += 1;
                        }
                    }
                }
                acc
            }
        }
    }

    pub fn squared_norm(&self) -> f64 {
        match self {
            RowView::Dense(a) => a.iter().map(|x| x * x).sum(),
            RowView::Sparse { values, .. } => values.iter().map(|x| x * x).sum(),
        }
    }

    /// Columnas con valor distinto de cero, ordenadas.
    pub fn nonzero_columns(&self) -> Vec<usize> {
        match self {
            RowView::Dense(a) => a.iter().enumerate().filter(|(_, v)| **v != 0.0).map(|(j, _)| j).collect(),
            RowView::Sparse { indices, values } => indices.iter()
                                                          .zip(values.iter())
                                                          .filter(|(_, v)| **v != 0.0)
                                                          .map(|(&j, _)| j)
                                                          .collect(),
        }
    }
}
