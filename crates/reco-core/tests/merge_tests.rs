//! Pruebas para el merge de params (base del step + override del run).
//!
//! Semántica shallow: claves de `b` sobreescriben claves de `a`.

use reco_core::injection::merge_json;
use serde_json::json;

#[test]
fn merge_shallow_overrides_keys() {
    let base = json!({"min_df": 1, "strategy": {"kind": "cosine"}, "binary": false});
    let over = json!({"min_df": 2, "strategy": {"kind": "jaccard"}, "max_features": 50});

    let out = merge_json(&base, &over);

    assert_eq!(out["min_df"], json!(2));
    // los objetos anidados se reemplazan completos
    assert_eq!(out["strategy"], json!({"kind": "jaccard"}));
    assert_eq!(out["binary"], json!(false));
    assert_eq!(out["max_features"], json!(50));
}

#[test]
fn non_object_override_wins() {
    assert_eq!(merge_json(&json!({"a": 1}), &json!(null)), json!(null));
    assert_eq!(merge_json(&json!(3), &json!({"a": 1})), json!({"a": 1}));
}
