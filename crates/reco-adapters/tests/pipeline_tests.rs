//! Pipeline completo load -> fit -> features -> similarity sobre un store en memoria.

use reco_adapters::steps::{FIT_VECTORIZER, GENERATE_FEATURES, GENERATE_SIMILARITY, LOAD_DATA};
use reco_adapters::{default_pipeline, recommender_from_outcome, InlineDataSource, JsonFileSource, PipelineOptions};
use reco_core::{CoreEngineError, InMemoryArtifactStore, RunConfig, StepStatus};
use reco_domain::{DomainError, Recommender};
use serde_json::json;

fn catalog() -> InlineDataSource {
    InlineDataSource::from_pairs([(1, "red apple"), (2, "Red, apple!"), (3, "blue sky"), (4, "red sky")])
}

#[test]
fn end_to_end_recommendations() {
    let mut orch = default_pipeline(catalog(), InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    let outcome = orch.run(&RunConfig::new()).unwrap();
    assert_eq!(outcome.executed_steps(),
               vec![LOAD_DATA, FIT_VECTORIZER, GENERATE_FEATURES, GENERATE_SIMILARITY]);

    let rec = recommender_from_outcome(&outcome).unwrap();
    let top = rec.recommend(1, 2).unwrap();
    assert_eq!(top[0].id, 2);
    assert!((top[0].score - 1.0).abs() < 1e-9);
    assert_eq!(top[1].id, 4);
    assert!(top.iter().all(|r| r.id != 1 && (-1.0..=1.0).contains(&r.score)));

    // 3 no comparte tokens con 1
    let all = rec.recommend(1, 10).unwrap();
    assert_eq!(all.last().map(|r| (r.id, r.score)), Some((3, 0.0)));
    assert_eq!(rec.recommend(99, 5), Err(DomainError::UnknownEntity(99)));
}

#[test]
fn second_run_is_all_cache_hits_with_same_artifacts() {
    let mut orch = default_pipeline(catalog(), InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    let first = orch.run(&RunConfig::new()).unwrap();
    let second = orch.run(&RunConfig::new()).unwrap();
    assert!(second.all_cache_hits());
    assert!(second.executed_steps().is_empty());
    assert_eq!(first.run_fingerprint, second.run_fingerprint);
    for (name, artifact) in &first.artifacts {
        assert_eq!(second.artifact(name).map(|a| &a.value), Some(&artifact.value));
    }
}

#[test]
fn similarity_override_only_recomputes_similarity() {
    let mut orch = default_pipeline(catalog(), InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    orch.run(&RunConfig::new()).unwrap();
    let cfg = RunConfig::new().with_override(GENERATE_SIMILARITY, json!({"strategy": {"kind": "jaccard"}}));
    let out = orch.run(&cfg).unwrap();
    assert_eq!(out.status_of(LOAD_DATA), Some(StepStatus::CacheHit));
    assert_eq!(out.status_of(FIT_VECTORIZER), Some(StepStatus::CacheHit));
    assert_eq!(out.status_of(GENERATE_FEATURES), Some(StepStatus::CacheHit));
    assert_eq!(out.status_of(GENERATE_SIMILARITY), Some(StepStatus::Succeeded));

    // jaccard(1, 4) = |{red}| / |{red, apple, sky}|
    let rec = recommender_from_outcome(&out).unwrap();
    let four = rec.recommend(1, 3).unwrap().into_iter().find(|r| r.id == 4).unwrap();
    assert!((four.score - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn vectorizer_override_invalidates_downstream_only() {
    let mut orch = default_pipeline(catalog(), InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    orch.run(&RunConfig::new()).unwrap();
    let out = orch.run(&RunConfig::new().with_override(FIT_VECTORIZER, json!({"binary": true}))).unwrap();
    assert_eq!(out.status_of(LOAD_DATA), Some(StepStatus::CacheHit));
    assert_eq!(out.executed_steps(), vec![FIT_VECTORIZER, GENERATE_FEATURES, GENERATE_SIMILARITY]);
}

#[test]
fn dataset_change_invalidates_everything() {
    let store = InMemoryArtifactStore::new();
    let mut orch = default_pipeline(catalog(), store, PipelineOptions::default()).unwrap();
    orch.run(&RunConfig::new()).unwrap();
    let plan = orch.plan(&RunConfig::new()).unwrap();
    assert!(plan.iter().all(|p| p.cached));

    let edited = InlineDataSource::from_pairs([(1, "red apple"), (2, "green apple")]);
    let mut other = default_pipeline(edited, InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    let fresh = other.plan(&RunConfig::new()).unwrap();
    assert!(fresh.iter().all(|p| !p.cached));
    assert_ne!(plan[0].fingerprint, fresh[0].fingerprint);
}

#[test]
fn duplicate_ids_fail_at_load_data() {
    let dup = InlineDataSource::from_pairs([(1, "a"), (1, "b")]);
    let mut orch = default_pipeline(dup, InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    match orch.run(&RunConfig::new()) {
        Err(e @ CoreEngineError::StepExecution { .. }) => assert_eq!(e.step_id(), Some(LOAD_DATA)),
        other => panic!("expected step failure, got {other:?}"),
    }
    assert!(orch.artifact_store().is_empty());
}

#[test]
fn unreadable_dataset_file_fails_at_load_data() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("missing.json"));
    let mut orch = default_pipeline(source, InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    match orch.run(&RunConfig::new()) {
        Err(e @ CoreEngineError::StepExecution { .. }) => {
            assert_eq!(e.step_id(), Some(LOAD_DATA));
            assert!(e.to_string().contains("missing.json"), "{e}");
        }
        other => panic!("expected step failure, got {other:?}"),
    }
    assert!(matches!(orch.plan(&RunConfig::new()),
                     Err(CoreEngineError::StepExecution { ref step_id, .. }) if step_id == LOAD_DATA));
    assert!(orch.artifact_store().is_empty());
}

#[test]
fn malformed_override_is_rejected_before_running() {
    let mut orch = default_pipeline(catalog(), InMemoryArtifactStore::new(), PipelineOptions::default()).unwrap();
    let cfg = RunConfig::new().with_override(FIT_VECTORIZER, json!({"min_df": "many"}));
    assert!(matches!(orch.run(&cfg), Err(CoreEngineError::InvalidArgument(_))));
    assert!(orch.artifact_store().is_empty());
    let cfg = RunConfig::new().with_override(GENERATE_SIMILARITY, json!({"strategy": {"kind": "manhattan"}}));
    assert!(matches!(orch.run(&cfg), Err(CoreEngineError::InvalidArgument(_))));
}
