use reco_core::{ArtifactFormat, ArtifactValue};
use serde_json::Value;

use super::{wrong_kind, Codec};
use crate::error::StoreError;

/// Documento YAML, pensado para configuración y metadatos editables a mano.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Yaml
    }

    fn encode(&self, value: &ArtifactValue) -> Result<Vec<u8>, StoreError> {
        match value {
            ArtifactValue::Document(doc) => serde_yaml::to_string(doc).map(String::into_bytes)
                                                                      .map_err(|e| StoreError::Serialization(format!("yaml: {e}"))),
            other => Err(wrong_kind(self.format(), other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArtifactValue, StoreError> {
        serde_yaml::from_slice::<Value>(bytes).map(ArtifactValue::Document)
                                              .map_err(|e| StoreError::Corrupt(format!("yaml: {e}")))
    }
}
