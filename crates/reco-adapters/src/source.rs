//! Fuentes de datos para `LoadDataStep`.
//!
//! `describe()` entra en el fingerprint del step de carga: debe cambiar
//! cuando cambia lo que `load()` devolvería. `snapshot()` devuelve datos y
//! descripción de una misma lectura.
use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use reco_core::hashing::{hash_bytes, hash_value};
use serde_json::{json, Value};

use crate::artifacts::{RawDataset, RawRecord};
use crate::errors::AdapterError;

pub trait DataSource: Debug + Send + Sync {
    fn load(&self) -> Result<RawDataset, AdapterError>;
    fn describe(&self) -> Result<Value, AdapterError>;

    /// Dataset y su descripción, consistentes entre sí.
    fn snapshot(&self) -> Result<(RawDataset, Value), AdapterError> {
        Ok((self.load()?, self.describe()?))
    }
}

/// Dataset en memoria (tests, demos).
#[derive(Debug, Clone)]
pub struct InlineDataSource {
    dataset: RawDataset,
}

impl InlineDataSource {
    pub fn new(dataset: RawDataset) -> Self {
        Self { dataset }
    }

    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (i64, S)>) -> Self {
        Self::new(RawDataset::new(pairs.into_iter().map(|(id, text)| RawRecord::new(id, text)).collect()))
    }
}

impl DataSource for InlineDataSource {
    fn load(&self) -> Result<RawDataset, AdapterError> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> Result<Value, AdapterError> {
        let content = serde_json::to_value(&self.dataset).map_err(|e| AdapterError::Parse(e.to_string()))?;
        Ok(json!({ "kind": "inline", "content_hash": hash_value(&content) }))
    }
}

/// Archivo JSON con un array de `{ "id": <int>, "text": <string> }`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<u8>, AdapterError> {
        fs::read(&self.path).map_err(|e| AdapterError::Io { path: self.path.clone(),
                                                            source: e })
    }

    fn parse(&self, bytes: &[u8]) -> Result<RawDataset, AdapterError> {
        let records: Vec<RawRecord> =
            serde_json::from_slice(bytes).map_err(|e| AdapterError::Parse(format!("{}: {e}", self.path.display())))?;
        Ok(RawDataset::new(records))
    }

    fn description(&self, bytes: &[u8]) -> Value {
        json!({
            "kind": "json_file",
            "path": self.path.display().to_string(),
            "content_hash": hash_bytes(bytes),
        })
    }
}

impl DataSource for JsonFileSource {
    fn load(&self) -> Result<RawDataset, AdapterError> {
        self.parse(&self.read()?)
    }

    /// Incluye el hash del contenido: editar el archivo invalida la cache.
    fn describe(&self) -> Result<Value, AdapterError> {
        Ok(self.description(&self.read()?))
    }

    fn snapshot(&self) -> Result<(RawDataset, Value), AdapterError> {
        let bytes = self.read()?;
        Ok((self.parse(&bytes)?, self.description(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_description_tracks_content() {
        let a = InlineDataSource::from_pairs([(1, "x"), (2, "y")]);
        let b = InlineDataSource::from_pairs([(1, "x"), (2, "z")]);
        assert_eq!(a.describe().unwrap(), a.clone().describe().unwrap());
        assert_ne!(a.describe().unwrap(), b.describe().unwrap());
        assert_eq!(a.load().unwrap().len(), 2);
    }

    #[test]
    fn json_file_round_trip_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, r#"[{"id": 4, "text": "red apple"}, {"id": 9, "text": "green pear"}]"#).unwrap();
        let src = JsonFileSource::new(&path);
        let ds = src.load().unwrap();
        assert_eq!(ds.records[1], RawRecord::new(9, "green pear"));
        let before = src.describe().unwrap();
        fs::write(&path, r#"[{"id": 4, "text": "red apple"}]"#).unwrap();
        assert_ne!(before["content_hash"], src.describe().unwrap()["content_hash"]);
    }

    #[test]
    fn snapshot_describes_the_bytes_it_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, r#"[{"id": 1, "text": "tea"}]"#).unwrap();
        let src = JsonFileSource::new(&path);
        let described = src.describe().unwrap();
        let (ds, snap) = src.snapshot().unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(snap, described);

        fs::write(&path, r#"[{"id": 1, "text": "tea"}, {"id": 2, "text": "milk"}]"#).unwrap();
        let (ds, snap) = src.snapshot().unwrap();
        assert_eq!(ds.len(), 2);
        assert_ne!(snap, described);
    }

    #[test]
    fn missing_or_malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = JsonFileSource::new(dir.path().join("nope.json"));
        assert!(matches!(missing.load(), Err(AdapterError::Io { .. })));
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"id\": 1}").unwrap();
        assert!(matches!(JsonFileSource::new(&path).load(), Err(AdapterError::Parse(_))));
    }
}
