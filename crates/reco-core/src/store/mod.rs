//! Contrato del Artifact Store y backend en memoria.
//!
//! El store es dueño exclusivo de los bytes persistidos. El orquestador sólo
//! le pide:
//! - `load`: el artifact `name` con formato `format` bajo `fingerprint`, o
//!   `None` si no existe (cache miss).
//! - `save`: persistir un artifact de forma atómica; un lector nunca debe
//!   observar un artifact a medio escribir.
//!
//! Las implementaciones validan que el valor tenga la forma del formato
//! (`ArtifactFormat::check`) antes de escribir.
use std::collections::HashMap;

use crate::errors::CoreEngineError;
use crate::model::{Artifact, ArtifactFormat};

pub trait ArtifactStore {
    /// Persiste el artifact y devuelve su ubicación física.
    fn save(&mut self, artifact: &Artifact) -> Result<String, CoreEngineError>;

    /// Carga el artifact si existe bajo ese fingerprint.
    ///
    /// Si lo almacenado declara otro fingerprint, la implementación debe
    /// devolver `CoreEngineError::CacheFingerprintMismatch`.
    fn load(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> Result<Option<Artifact>, CoreEngineError>;

    /// Chequeo barato de existencia (usado por `Orchestrator::plan`).
    fn contains(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> bool {
        matches!(self.load(name, format, fingerprint), Ok(Some(_)))
    }
}

/// Store en memoria, útil para tests y prototipos.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    inner: HashMap<(String, String), Artifact>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Elimina todas las versiones de un artifact (simula pérdida de cache).
    pub fn evict(&mut self, name: &str) {
        self.inner.retain(|(n, _), _| n != name);
    }

    /// Acceso directo para tests que quieren corromper una entrada.
    pub fn entry_mut(&mut self, name: &str, fingerprint: &str) -> Option<&mut Artifact> {
        self.inner.get_mut(&(name.to_string(), fingerprint.to_string()))
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn save(&mut self, artifact: &Artifact) -> Result<String, CoreEngineError> {
        artifact.format.check(&artifact.value)?;
        let location = format!("memory://{}/{}", artifact.name, artifact.fingerprint);
        let mut stored = artifact.clone();
        stored.location = Some(location.clone());
        self.inner.insert((artifact.name.clone(), artifact.fingerprint.clone()), stored);
        Ok(location)
    }

    fn load(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> Result<Option<Artifact>, CoreEngineError> {
        let Some(found) = self.inner.get(&(name.to_string(), fingerprint.to_string())) else {
            return Ok(None);
        };
        if found.fingerprint != fingerprint {
            return Err(CoreEngineError::CacheFingerprintMismatch { artifact: name.to_string(),
                                                                   expected: fingerprint.to_string(),
                                                                   found: found.fingerprint.clone() });
        }
        if found.format != format {
            return Ok(None);
        }
        Ok(Some(found.clone()))
    }
}
