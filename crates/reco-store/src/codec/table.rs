//! Codec columnar: `RFTB` + versión + bincode de `[(nombre, columna)]`.
//! Sólo acepta tablas; cualquier otro valor es un error de formato.
use reco_core::{ArtifactFormat, ArtifactValue, Column, Table};

use super::{read_header, write_header, wrong_kind, Codec};
use crate::error::StoreError;

const MAGIC: &[u8; 4] = b"RFTB";
const VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct TableCodec;

impl Codec for TableCodec {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Table
    }

    fn encode(&self, value: &ArtifactValue) -> Result<Vec<u8>, StoreError> {
        let ArtifactValue::Table(table) = value else {
            return Err(wrong_kind(self.format(), value));
        };
        let columns: Vec<(&str, &Column)> = table.columns().iter().map(|c| (c.name.as_str(), &c.data)).collect();
        let mut out = Vec::new();
        write_header(&mut out, MAGIC, VERSION);
        let body = bincode::serialize(&columns).map_err(|e| StoreError::Serialization(format!("table: {e}")))?;
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArtifactValue, StoreError> {
        let body = read_header(bytes, MAGIC, VERSION)?;
        let columns: Vec<(String, Column)> =
            bincode::deserialize(body).map_err(|e| StoreError::Corrupt(format!("table: {e}")))?;
        let mut table = Table::new();
        for (name, data) in columns {
            table = table.with_column(name, data).map_err(|e| StoreError::Corrupt(format!("table: {e}")))?;
        }
        Ok(ArtifactValue::Table(table))
    }
}
