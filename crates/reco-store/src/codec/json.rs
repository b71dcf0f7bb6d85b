use reco_core::{ArtifactFormat, ArtifactValue};

use super::{wrong_kind, Codec};
use crate::error::StoreError;

/// Documento JSON legible. El orden de claves no se preserva al recargar.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Json
    }

    fn encode(&self, value: &ArtifactValue) -> Result<Vec<u8>, StoreError> {
        match value {
            ArtifactValue::Document(doc) => {
                serde_json::to_vec_pretty(doc).map_err(|e| StoreError::Serialization(format!("json: {e}")))
            }
            other => Err(wrong_kind(self.format(), other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArtifactValue, StoreError> {
        serde_json::from_slice(bytes).map(ArtifactValue::Document)
                                     .map_err(|e| StoreError::Corrupt(format!("json: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_round_trip() {
        let v = ArtifactValue::Document(json!({"b": [1, 2.5, null], "a": {"x": "y"}, "t": true}));
        let bytes = JsonCodec.encode(&v).unwrap();
        assert_eq!(JsonCodec.decode(&bytes).unwrap(), v);
    }

    #[test]
    fn floats_come_back_bit_for_bit() {
        // xorshift64: patrones de bits arbitrarios, incluidos subnormales
        let mut state = 0x9E37_79B9_7F4A_7C15_u64;
        let floats: Vec<f64> = std::iter::repeat_with(|| {
                                   state ^= state << 13;
                                   state ^= state >> 7;
                                   state ^= state << 17;
                                   f64::from_bits(state)
                               }).filter(|x| x.is_finite())
                                 .take(20_000)
                                 .collect();
        let v = ArtifactValue::Document(json!({ "scores": floats }));
        let back = JsonCodec.decode(&JsonCodec.encode(&v).unwrap()).unwrap();
        let got = back.as_document().and_then(|d| d["scores"].as_array()).unwrap();
        assert_eq!(got.len(), floats.len());
        for (x, y) in floats.iter().zip(got) {
            assert_eq!(y.as_f64().map(f64::to_bits), Some(x.to_bits()), "{x:e}");
        }
        for x in [1.0715660391465826e-75, -1.603964615428183e143, f64::MIN_POSITIVE, f64::MAX] {
            let v = ArtifactValue::Document(json!(x));
            assert_eq!(JsonCodec.decode(&JsonCodec.encode(&v).unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn rejects_non_documents() {
        let err = JsonCodec.encode(&ArtifactValue::Object(vec![1])).unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }
}
