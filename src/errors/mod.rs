//! Errores de la aplicación (binario `recoflow`).
use reco_adapters::AdapterError;
use reco_core::CoreEngineError;
use reco_domain::DomainError;
use reco_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("uso inválido: {0}")]
    Usage(String),
    #[error("error de configuración: {0}")]
    Config(String),
    #[error(transparent)]
    Core(#[from] CoreEngineError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("error serializando salida: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Código de salida del proceso: 2 uso, 3 configuración, 4 entidad
    /// desconocida, 5 fallo de pipeline o store.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Config(_) => 3,
            Self::Domain(DomainError::UnknownEntity(_)) => 4,
            Self::Domain(DomainError::InvalidArgument(_)) | Self::Core(CoreEngineError::InvalidArgument(_)) => 2,
            _ => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_variant_format() {
        let err = AppError::Usage("falta --id".into());
        assert_eq!(err.to_string(), "uso inválido: falta --id");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: AppError = DomainError::UnknownEntity(99).into();
        assert_eq!(err.to_string(), "unknown entity id 99");
        assert_eq!(err.exit_code(), 4);
        let err: AppError = CoreEngineError::Store("disk full".into()).into();
        assert_eq!(err.exit_code(), 5);
    }
}
