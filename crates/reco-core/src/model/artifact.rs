//! Artifact del pipeline.
//!
//! Un `Artifact` es la unidad de datos intercambiada entre steps y persistida
//! por el `ArtifactStore`:
//! - `name` es el nombre lógico declarado por el step productor.
//! - `format` selecciona el codec con el que se persiste (conjunto cerrado).
//! - `fingerprint` lo calcula el orquestador a partir de los fingerprints de
//!   los inputs y de la configuración del step (ver `StepFingerprintInput`).
//!   Nunca depende del contenido producido ni de timestamps.
//! - `location` lo asigna el store al guardar (ruta o URI en memoria).
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{NumericArray, Table};
use crate::errors::CoreEngineError;
use crate::hashing::{hash_bytes, hash_value};

/// Formatos soportados por el store. Cada uno tiene un codec aislado.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    /// Texto estructurado legible (metadatos, configuración).
    Json,
    Yaml,
    /// Objeto opaco serializado (p. ej. un vectorizer entrenado).
    Binary,
    /// Matriz numérica densa o dispersa.
    Array,
    /// Tabla columnar.
    Table,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Binary => "binary",
            Self::Array => "array",
            Self::Table => "table",
        }
    }

    /// Extensión de archivo usada por el store en disco.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Binary => "bin",
            Self::Array => "arr",
            Self::Table => "tbl",
        }
    }

    pub fn accepts(&self, value: &ArtifactValue) -> bool {
        matches!((self, value),
                 (Self::Json | Self::Yaml, ArtifactValue::Document(_))
                 | (Self::Binary, ArtifactValue::Object(_))
                 | (Self::Array, ArtifactValue::Array(_))
                 | (Self::Table, ArtifactValue::Table(_)))
    }

    /// Verifica que `value` tenga la forma que exige este formato.
    pub fn check(&self, value: &ArtifactValue) -> Result<(), ArtifactFormatError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ArtifactFormatError { format: *self,
                                      found: value.kind_name().to_string() })
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un codec recibió un valor con la forma equivocada (p. ej. datos no
/// tabulares enviados al formato `Table`). Es fatal para el step.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("format '{format}' cannot encode a value of kind '{found}'")]
pub struct ArtifactFormatError {
    pub format: ArtifactFormat,
    pub found: String,
}

/// Contenido tipado de un artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArtifactValue {
    Document(Value),
    Object(Vec<u8>),
    Array(NumericArray),
    Table(Table),
}

impl ArtifactValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Table(_) => "table",
        }
    }

    /// Serializa un objeto entrenado/opaco con bincode.
    pub fn from_object<T: Serialize>(object: &T) -> Result<Self, CoreEngineError> {
        bincode::serialize(object).map(Self::Object)
                                  .map_err(|e| CoreEngineError::Collaborator(format!("object encode: {e}")))
    }

    /// Decodifica un objeto previamente guardado con `from_object`.
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T, CoreEngineError> {
        match self {
            Self::Object(bytes) => {
                bincode::deserialize(bytes).map_err(|e| CoreEngineError::Collaborator(format!("object decode: {e}")))
            }
            other => Err(ArtifactFormatError { format: ArtifactFormat::Binary,
                                               found: other.kind_name().to_string() }.into()),
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Self::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Hash del contenido. Sólo se usa para artifacts externos (sin step
    /// productor) y para verificar integridad en disco; los artifacts de steps
    /// se identifican por fingerprint, no por contenido.
    pub fn content_hash(&self) -> Result<String, CoreEngineError> {
        match self {
            Self::Document(v) => Ok(hash_value(v)),
            Self::Object(bytes) => Ok(hash_bytes(bytes)),
            other => bincode::serialize(other).map(|b| hash_bytes(&b))
                                              .map_err(|e| CoreEngineError::Internal(format!("content hash: {e}"))),
        }
    }
}

/// Salida declarada por un step: nombre lógico + formato de persistencia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    pub format: ArtifactFormat,
}

impl OutputSpec {
    pub fn new(name: impl Into<String>, format: ArtifactFormat) -> Self {
        Self { name: name.into(),
               format }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub format: ArtifactFormat,
    pub fingerprint: String,
    pub value: ArtifactValue,
    pub location: Option<String>, // asignada por el store al guardar
}

impl Artifact {
    pub fn new(name: impl Into<String>, format: ArtifactFormat, fingerprint: impl Into<String>, value: ArtifactValue) -> Self {
        Self { name: name.into(),
               format,
               fingerprint: fingerprint.into(),
               value,
               location: None }
    }
}
