//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad determinista e idempotente que consume artifacts
//! declarados por nombre y produce exactamente un artifact de salida. Este
//! módulo define:
//! - `StepDefinition`: interfaz neutral usada por el orquestador.
//! - `TypedStep`: interfaz de alto nivel con params fuertemente tipados.
//! - `StepRunResult` y `StepStatus`.

pub mod definition;
mod run_result;
mod status;
pub mod typed;

pub use definition::StepDefinition;
pub use run_result::StepRunResult;
pub use status::StepStatus;
pub use typed::TypedStep;
