use reco_core::{ArtifactFormat, ArtifactValue};

use super::{wrong_kind, Codec};
use crate::error::StoreError;

/// Blob opaco (objetos entrenados ya serializados por su dueño). Se escribe tal cual.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Binary
    }

    fn encode(&self, value: &ArtifactValue) -> Result<Vec<u8>, StoreError> {
        match value {
            ArtifactValue::Object(bytes) => Ok(bytes.clone()),
            other => Err(wrong_kind(self.format(), other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArtifactValue, StoreError> {
        Ok(ArtifactValue::Object(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_untouched() {
        for blob in [vec![], vec![0u8, 255, 7, 7]] {
            let v = ArtifactValue::Object(blob.clone());
            let bytes = BinaryCodec.encode(&v).unwrap();
            assert_eq!(bytes, blob);
            assert_eq!(BinaryCodec.decode(&bytes).unwrap(), v);
        }
    }
}
