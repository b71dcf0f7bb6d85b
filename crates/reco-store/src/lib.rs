//! reco-store
//!
//! Implementación en disco del contrato `ArtifactStore` de reco-core.
//!
//! Módulos:
//! - `codec`: un codec por formato (json, yaml, binario, array, tabla).
//! - `fs`: `FsArtifactStore`, escritura atómica + manifest por versión.
//! - `config`: directorio raíz desde `.env` / entorno.
//! - `error`: `StoreError` y su traducción a `CoreEngineError`.

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;

pub use codec::{codec_for, Codec};
pub use config::{init_dotenv, StoreConfig};
pub use error::StoreError;
pub use fs::{ArtifactManifest, FsArtifactStore};
