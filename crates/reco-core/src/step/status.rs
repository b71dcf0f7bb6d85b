/// Estado de un Step dentro de un run.
///
/// Transiciones válidas:
/// - `Pending` -> `CacheHit`
/// - `Pending` -> `Running`
/// - `Running` -> `Succeeded`
/// - `Running` -> `Failed`
///
/// `CacheHit`, `Succeeded` y `Failed` son terminales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    /// Output reutilizado desde el store, sin ejecutar el step.
    CacheHit,
    Running,
    Succeeded,
    Failed,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CacheHit | Self::Succeeded | Self::Failed)
    }

    /// El output del step es válido para los steps siguientes.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::CacheHit | Self::Succeeded)
    }
}
