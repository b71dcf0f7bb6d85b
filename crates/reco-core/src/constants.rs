//! Constantes del motor core.
//!
//! Agrupa valores estáticos que participan en el cálculo de fingerprints.
//! Cambiar `ENGINE_VERSION` invalida todos los artifacts cacheados aunque la
//! definición del pipeline y los datos no cambien.

/// Versión lógica del motor. Forma parte del input de cada fingerprint de step.
/// Mantener estable mientras no haya cambios incompatibles en los artifacts.
pub const ENGINE_VERSION: &str = "R1.0";

/// Sufijo del manifest que acompaña a cada artifact persistido.
pub const MANIFEST_SUFFIX: &str = "manifest.json";
