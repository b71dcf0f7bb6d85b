//! Configuración del store desde variables de entorno.
//! Usa `RECOFLOW_ARTIFACT_DIR`; si no está definida se usa `./artifacts`.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

pub const ARTIFACT_DIR_VAR: &str = "RECOFLOW_ARTIFACT_DIR";
pub const DEFAULT_ARTIFACT_DIR: &str = "./artifacts";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let root = env::var(ARTIFACT_DIR_VAR).ok()
                                             .filter(|v| !v.trim().is_empty())
                                             .unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string());
        Self { root: PathBuf::from(root) }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
