//! Nombres de artifacts del pipeline y el dataset crudo.
//!
//! El dataset viaja entre steps como `Table` (`id: Int`, `text: Str`); estos
//! tipos sólo convierten en ambos sentidos. El orden de filas es el orden de
//! carga y define el `IdIndex`.
use reco_core::{Column, Table};
use reco_domain::IdIndex;
use serde::{Deserialize, Serialize};

use crate::errors::AdapterError;

pub const RAW_DATA: &str = "raw_data";
pub const VECTORIZER: &str = "vectorizer";
pub const FEATURES: &str = "features";
pub const SIMILARITY: &str = "similarity";

const ID_COLUMN: &str = "id";
const TEXT_COLUMN: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    pub text: String,
}

impl RawRecord {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self { id, text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDataset {
    pub records: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }

    /// Índice id -> fila; falla con ids repetidos.
    pub fn id_index(&self) -> Result<IdIndex, AdapterError> {
        Ok(IdIndex::from_ids(self.records.iter().map(|r| r.id))?)
    }

    pub fn to_table(&self) -> Result<Table, AdapterError> {
        let ids = self.records.iter().map(|r| r.id).collect();
        let texts = self.records.iter().map(|r| r.text.clone()).collect();
        Table::new().with_column(ID_COLUMN, Column::Int(ids))
                    .and_then(|t| t.with_column(TEXT_COLUMN, Column::Str(texts)))
                    .map_err(|e| AdapterError::InvalidDataset(e.to_string()))
    }

    pub fn from_table(table: &Table) -> Result<Self, AdapterError> {
        let (Some(Column::Int(ids)), Some(Column::Str(texts))) = (table.column(ID_COLUMN), table.column(TEXT_COLUMN))
        else {
            return Err(AdapterError::InvalidDataset(format!("expected columns '{ID_COLUMN}: int' and '{TEXT_COLUMN}: str'")));
        };
        let records = ids.iter().zip(texts.iter()).map(|(&id, text)| RawRecord::new(id, text.clone())).collect();
        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_conversion_preserves_order() {
        let ds = RawDataset::new(vec![RawRecord::new(7, "b"), RawRecord::new(3, "a")]);
        let t = ds.to_table().unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(RawDataset::from_table(&t).unwrap(), ds);
        assert_eq!(ds.id_index().unwrap().ids(), &[7, 3]);
    }

    #[test]
    fn foreign_tables_are_rejected() {
        let t = Table::new().with_column("id", Column::Str(vec!["x".into()])).unwrap();
        assert!(matches!(RawDataset::from_table(&t), Err(AdapterError::InvalidDataset(_))));
    }

    #[test]
    fn duplicate_ids_fail_the_index() {
        let ds = RawDataset::new(vec![RawRecord::new(1, "a"), RawRecord::new(1, "b")]);
        assert!(matches!(ds.id_index(), Err(AdapterError::Domain(_))));
    }
}
