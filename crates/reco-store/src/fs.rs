//! Artifact store sobre el sistema de archivos.
//!
//! Layout: `<root>/<name>/<fingerprint>.<ext>` para el payload y
//! `<root>/<name>/<fingerprint>.manifest.json` para sus metadatos.
//!
//! Escritura: payload y manifest se escriben en un archivo temporal del mismo
//! directorio y se renombran atómicamente, el manifest al final. Un artifact
//! existe para `load` sólo cuando su manifest existe, así que un lector nunca
//! observa un payload a medio escribir y una escritura interrumpida no deja un
//! artifact visiblemente válido.
//!
//! Lectura: el manifest debe declarar el fingerprint pedido y el hash del
//! payload debe coincidir; si no, se devuelve error (el orquestador lo trata
//! como cache miss y recalcula).
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use reco_core::constants::{ENGINE_VERSION, MANIFEST_SUFFIX};
use reco_core::hashing::hash_bytes;
use reco_core::{Artifact, ArtifactFormat, ArtifactStore, CoreEngineError};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::codec::codec_for;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Metadatos persistidos junto a cada payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub format: ArtifactFormat,
    pub fingerprint: String,
    /// blake3 de los bytes del payload.
    pub content_hash: String,
    pub size_bytes: u64,
    pub engine_version: String,
    pub written_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Abre (y crea si hace falta) el directorio raíz.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::open(config.root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn payload_path(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> PathBuf {
        self.root.join(name).join(format!("{fingerprint}.{}", format.extension()))
    }

    pub fn manifest_path(&self, name: &str, fingerprint: &str) -> PathBuf {
        self.root.join(name).join(format!("{fingerprint}.{MANIFEST_SUFFIX}"))
    }

    /// Lee el manifest de una versión, si existe.
    pub fn manifest(&self, name: &str, fingerprint: &str) -> Result<Option<ArtifactManifest>, StoreError> {
        check_component(name)?;
        check_component(fingerprint)?;
        let path = self.manifest_path(name, fingerprint);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map(Some)
                                      .map_err(|e| StoreError::Corrupt(format!("manifest {}: {e}", path.display())))
    }

    /// Fingerprints con manifest para `name`, ordenados.
    pub fn versions(&self, name: &str) -> Result<Vec<String>, StoreError> {
        check_component(name)?;
        let dir = self.root.join(name);
        let entries = match fs::read_dir(&dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };
        let suffix = format!(".{MANIFEST_SUFFIX}");
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            if let Some(fp) = entry.file_name().to_str().and_then(|f| f.strip_suffix(&suffix)) {
                out.push(fp.to_string());
            }
        }
        out.sort();
        Ok(out)
    }

    fn save_inner(&self, artifact: &Artifact) -> Result<PathBuf, StoreError> {
        check_component(&artifact.name)?;
        check_component(&artifact.fingerprint)?;
        artifact.format.check(&artifact.value)?;
        let payload = codec_for(artifact.format).encode(&artifact.value)?;
        let dir = self.root.join(&artifact.name);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let payload_path = self.payload_path(&artifact.name, artifact.format, &artifact.fingerprint);
        write_atomic(&dir, &payload_path, &payload)?;

        let manifest = ArtifactManifest { name: artifact.name.clone(),
                                          format: artifact.format,
                                          fingerprint: artifact.fingerprint.clone(),
                                          content_hash: hash_bytes(&payload),
                                          size_bytes: payload.len() as u64,
                                          engine_version: ENGINE_VERSION.to_string(),
                                          written_at: Utc::now() };
        let manifest_bytes =
            serde_json::to_vec_pretty(&manifest).map_err(|e| StoreError::Serialization(format!("manifest: {e}")))?;
        write_atomic(&dir, &self.manifest_path(&artifact.name, &artifact.fingerprint), &manifest_bytes)?;
        debug!("saved artifact name={} fp={} bytes={}",
               artifact.name,
               artifact.fingerprint,
               payload.len());
        Ok(payload_path)
    }

    fn load_inner(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> Result<Option<Artifact>, StoreError> {
        let Some(manifest) = self.manifest(name, fingerprint)? else {
            return Ok(None);
        };
        if manifest.fingerprint != fingerprint {
            return Err(StoreError::FingerprintMismatch { artifact: name.to_string(),
                                                         expected: fingerprint.to_string(),
                                                         found: manifest.fingerprint });
        }
        if manifest.format != format {
            debug!("artifact {name}@{fingerprint} stored as {} but {} requested", manifest.format, format);
            return Ok(None);
        }
        let path = self.payload_path(name, format, fingerprint);
        let payload = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        if hash_bytes(&payload) != manifest.content_hash {
            warn!("content hash mismatch for {}", path.display());
            return Err(StoreError::Corrupt(format!("content hash mismatch for {}", path.display())));
        }
        let value = codec_for(format).decode(&payload)?;
        let mut artifact = Artifact::new(name, format, fingerprint, value);
        artifact.location = Some(path.display().to_string());
        Ok(Some(artifact))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn save(&mut self, artifact: &Artifact) -> Result<String, CoreEngineError> {
        Ok(self.save_inner(artifact)?.display().to_string())
    }

    fn load(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> Result<Option<Artifact>, CoreEngineError> {
        Ok(self.load_inner(name, format, fingerprint)?)
    }

    /// Sólo mira el manifest; no lee ni verifica el payload.
    fn contains(&self, name: &str, format: ArtifactFormat, fingerprint: &str) -> bool {
        matches!(self.manifest(name, fingerprint),
                 Ok(Some(m)) if m.fingerprint == fingerprint && m.format == format)
    }
}

/// Escribe en un temporal del mismo directorio y renombra sobre `target`.
fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(target).map_err(|e| StoreError::io(target, e.error))?;
    Ok(())
}

/// Nombres y fingerprints se usan como componentes de ruta.
fn check_component(s: &str) -> Result<(), StoreError> {
    let ok = !s.is_empty()
             && s != "."
             && s != ".."
             && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(s.to_string()))
    }
}
