//! recoflow
//!
//! Librería del binario `recoflow`:
//! - `config`: `AppConfig` desde `.env` / entorno.
//! - `errors`: `AppError` y códigos de salida.
//! - `cli`: parseo de argumentos y ejecución de `run`, `recommend`,
//!   `recommend-batch` sobre el pipeline por defecto con store en disco.

pub mod cli;
pub mod config;
pub mod errors;

pub use config::AppConfig;
pub use errors::AppError;
