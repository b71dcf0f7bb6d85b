//! Índice biyectivo id externo <-> fila interna.
use std::collections::HashMap;

use crate::errors::DomainError;

/// Mapeo total y estable durante un run entre ids de entidad y filas de la
/// matriz. Un id fuera del dominio es un error, nunca un no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdIndex {
    ids: Vec<i64>,
    rows: HashMap<i64, usize>,
}

impl IdIndex {
    /// Construye el índice en el orden dado; los ids repetidos se rechazan.
    pub fn from_ids<I: IntoIterator<Item = i64>>(ids: I) -> Result<Self, DomainError> {
        let ids: Vec<i64> = ids.into_iter().collect();
        let mut rows = HashMap::with_capacity(ids.len());
        for (row, &id) in ids.iter().enumerate() {
            if rows.insert(id, row).is_some() {
                return Err(DomainError::InvalidArgument(format!("duplicate entity id {id}")));
            }
        }
        Ok(Self { ids, rows })
    }

    pub fn row_of(&self, id: i64) -> Result<usize, DomainError> {
        self.rows.get(&id).copied().ok_or(DomainError::UnknownEntity(id))
    }

    pub fn id_at(&self, row: usize) -> Option<i64> {
        self.ids.get(row).copied()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
