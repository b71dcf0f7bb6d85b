use serde::Serialize;
use serde_json::{json, Value};

use super::OutputSpec;
use crate::hashing::hash_value;

/// Fingerprint de un input ya resuelto (nombre del artifact + su fingerprint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFingerprint {
    pub name: String,
    pub fingerprint: String,
}

/// Insumos para calcular el fingerprint de un step.
/// NO es el fingerprint final (string hash) sino el modelo previo a canonicalizar.
///
/// Sólo entran valores deterministas: versión del motor, identidad del step,
/// salida declarada, fingerprints de inputs (en orden declarado) y params
/// efectivos. Nunca timestamps ni presencia de archivos.
#[derive(Serialize)]
pub struct StepFingerprintInput<'a> {
    pub engine_version: &'a str,
    pub step_id: &'a str,
    pub output: &'a OutputSpec,
    pub inputs: &'a [InputFingerprint],
    pub params: &'a Value, // canonicalizable
}

impl StepFingerprintInput<'_> {
    pub fn to_json(&self) -> Value {
        json!({
            "engine_version": self.engine_version,
            "step_id": self.step_id,
            "output": { "name": self.output.name, "format": self.output.format.as_str() },
            "input_fingerprints": self.inputs.iter()
                                             .map(|i| json!({ "name": i.name, "fingerprint": i.fingerprint }))
                                             .collect::<Vec<_>>(),
            "params": self.params,
        })
    }

    /// Hash hex (blake3) del JSON canónico.
    pub fn fingerprint(&self) -> String {
        hash_value(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ENGINE_VERSION;
    use crate::model::ArtifactFormat;

    fn fp(params: Value, upstream: &str) -> String {
        let out = OutputSpec::new("similarity", ArtifactFormat::Array);
        let inputs = vec![InputFingerprint { name: "features".into(),
                                             fingerprint: upstream.into() }];
        StepFingerprintInput { engine_version: ENGINE_VERSION,
                               step_id: "generate_similarity",
                               output: &out,
                               inputs: &inputs,
                               params: &params }.fingerprint()
    }

    #[test]
    fn fingerprint_ignores_param_key_order() {
        let a = fp(json!({"strategy": {"kind": "cosine"}, "x": 1}), "u1");
        let b = fp(json!({"x": 1, "strategy": {"kind": "cosine"}}), "u1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_params_or_upstream() {
        let base = fp(json!({"x": 1}), "u1");
        assert_ne!(base, fp(json!({"x": 2}), "u1"));
        assert_ne!(base, fp(json!({"x": 1}), "u2"));
    }
}
