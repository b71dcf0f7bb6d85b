//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) una vez y construye `AppConfig`.
//!
//! Variables:
//! - `RECOFLOW_ARTIFACT_DIR`: raíz del store (default `./artifacts`).
//! - `RECOFLOW_DATA_PATH`: dataset JSON por defecto.
//! - `RECOFLOW_STRATEGY`: cosine | dot | jaccard | euclidean (default cosine).
//! - `RECOFLOW_DEFAULT_K`: tamaño de top-k por defecto (default 10).
use std::env;
use std::path::PathBuf;

use reco_domain::{SimilarityStrategy, DEFAULT_K};
use reco_store::{init_dotenv, StoreConfig};

use crate::errors::AppError;

pub const DATA_PATH_VAR: &str = "RECOFLOW_DATA_PATH";
pub const STRATEGY_VAR: &str = "RECOFLOW_STRATEGY";
pub const DEFAULT_K_VAR: &str = "RECOFLOW_DEFAULT_K";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub data_path: Option<PathBuf>,
    pub strategy: SimilarityStrategy,
    pub default_k: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de lectura inyectable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let store = match non_empty(reco_store::config::ARTIFACT_DIR_VAR) {
            Some(dir) => StoreConfig::new(dir),
            None => StoreConfig::new(reco_store::config::DEFAULT_ARTIFACT_DIR),
        };
        let strategy = match non_empty(STRATEGY_VAR) {
            Some(s) => SimilarityStrategy::parse(&s).map_err(|e| AppError::Config(format!("{STRATEGY_VAR}: {e}")))?,
            None => SimilarityStrategy::default(),
        };
        let default_k = match non_empty(DEFAULT_K_VAR) {
            Some(v) => parse_k(&v).map_err(|e| AppError::Config(format!("{DEFAULT_K_VAR}: {e}")))?,
            None => DEFAULT_K,
        };
        Ok(Self { store,
                  data_path: non_empty(DATA_PATH_VAR).map(PathBuf::from),
                  strategy,
                  default_k })
    }
}

/// `k` positivo.
pub fn parse_k(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(k) if k > 0 => Ok(k),
        _ => Err(AppError::Usage(format!("k must be a positive integer, got '{raw}'"))),
    }
}
