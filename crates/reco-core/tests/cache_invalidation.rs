//! Propiedades de cache del orquestador sobre una cadena de 4 steps:
//! load -> fit -> features -> similarity.
//!
//! Cada step cuenta sus ejecuciones para distinguir CACHE_HIT de recomputo.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reco_core::model::ExecutionContext;
use reco_core::{ArtifactFormat, ArtifactStore, ArtifactValue, CancellationToken, CoreEngineError, DenseMatrix,
                InMemoryArtifactStore, NumericArray, Orchestrator, OutputSpec, RunConfig, RunEventKind, StepStatus,
                TypedStep};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default)]
struct Calls(Arc<AtomicUsize>);

impl Calls {
    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoadParams {
    rows: usize,
}

#[derive(Debug)]
struct Load(Calls);

impl TypedStep for Load {
    type Params = LoadParams;
    fn id(&self) -> &'static str {
        "load"
    }
    fn inputs(&self) -> &'static [&'static str] {
        &[]
    }
    fn output(&self) -> OutputSpec {
        OutputSpec::new("raw", ArtifactFormat::Json)
    }
    fn params(&self) -> LoadParams {
        LoadParams { rows: 3 }
    }
    fn run_typed(&self, _ctx: &ExecutionContext, p: LoadParams) -> Result<ArtifactValue, CoreEngineError> {
        self.0.hit();
        Ok(ArtifactValue::Document(json!((0..p.rows).collect::<Vec<_>>())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FitParams {
    scale: f64,
}

#[derive(Debug)]
struct Fit(Calls);

impl TypedStep for Fit {
    type Params = FitParams;
    fn id(&self) -> &'static str {
        "fit"
    }
    fn inputs(&self) -> &'static [&'static str] {
        &["raw"]
    }
    fn output(&self) -> OutputSpec {
        OutputSpec::new("model", ArtifactFormat::Binary)
    }
    fn params(&self) -> FitParams {
        FitParams { scale: 1.0 }
    }
    fn run_typed(&self, _ctx: &ExecutionContext, p: FitParams) -> Result<ArtifactValue, CoreEngineError> {
        self.0.hit();
        ArtifactValue::from_object(&p.scale)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FeatureParams {
    #[serde(default)]
    fail: bool,
}

#[derive(Debug)]
struct Features(Calls);

impl TypedStep for Features {
    type Params = FeatureParams;
    fn id(&self) -> &'static str {
        "features"
    }
    fn inputs(&self) -> &'static [&'static str] {
        &["raw", "model"]
    }
    fn output(&self) -> OutputSpec {
        OutputSpec::new("features", ArtifactFormat::Array)
    }
    fn params(&self) -> FeatureParams {
        FeatureParams::default()
    }
    fn run_typed(&self, ctx: &ExecutionContext, p: FeatureParams) -> Result<ArtifactValue, CoreEngineError> {
        self.0.hit();
        if p.fail {
            return Err(CoreEngineError::Collaborator("feature extraction exploded".into()));
        }
        let rows = ctx.input("raw")?.value.as_document().and_then(|d| d.as_array()).map(Vec::len).unwrap_or(0);
        let scale: f64 = ctx.input("model")?.value.to_object()?;
        let data = (0..rows).map(|i| scale * i as f64).collect();
        Ok(ArtifactValue::Array(NumericArray::Dense(DenseMatrix::new(rows, 1, data).unwrap())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimParams {
    offset: f64,
}

#[derive(Debug)]
struct Similarity(Calls);

impl TypedStep for Similarity {
    type Params = SimParams;
    fn id(&self) -> &'static str {
        "similarity"
    }
    fn inputs(&self) -> &'static [&'static str] {
        &["features"]
    }
    fn output(&self) -> OutputSpec {
        OutputSpec::new("similarity", ArtifactFormat::Array)
    }
    fn params(&self) -> SimParams {
        SimParams { offset: 0.0 }
    }
    fn run_typed(&self, ctx: &ExecutionContext, p: SimParams) -> Result<ArtifactValue, CoreEngineError> {
        self.0.hit();
        let n = ctx.input("features")?.value.as_array().map(|a| a.rows()).unwrap_or(0);
        let data = vec![p.offset; n * n];
        Ok(ArtifactValue::Array(NumericArray::Dense(DenseMatrix::new(n, n, data).unwrap())))
    }
}

struct Harness {
    calls: [Calls; 4],
}

impl Harness {
    fn new() -> Self {
        Self { calls: Default::default() }
    }

    fn orchestrator(&self, store: InMemoryArtifactStore) -> Orchestrator<InMemoryArtifactStore> {
        Orchestrator::new(store).first_step(Load(self.calls[0].clone()))
                                .add_step(Fit(self.calls[1].clone()))
                                .add_step(Features(self.calls[2].clone()))
                                .add_step(Similarity(self.calls[3].clone()))
                                .build()
                                .expect("valid chain")
    }

    fn counts(&self) -> Vec<usize> {
        self.calls.iter().map(Calls::get).collect()
    }
}

fn statuses(outcome: &reco_core::RunOutcome) -> Vec<StepStatus> {
    outcome.steps.iter().map(|s| s.status).collect()
}

use StepStatus::{CacheHit as H, Failed as X, Pending as P, Succeeded as S};

#[test]
fn unchanged_second_run_recomputes_nothing() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    let first = orch.run(&RunConfig::new()).unwrap();
    assert_eq!(statuses(&first), vec![S, S, S, S]);
    assert_eq!(h.counts(), vec![1, 1, 1, 1]);

    let second = orch.run(&RunConfig::new()).unwrap();
    assert_eq!(statuses(&second), vec![H, H, H, H]);
    assert_eq!(h.counts(), vec![1, 1, 1, 1], "no step may execute on an unchanged rerun");
    assert_eq!(first.artifact("similarity"), second.artifact("similarity"));
}

#[test]
fn cache_is_shared_across_independent_orchestrators() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    orch.run(&RunConfig::new()).unwrap();

    // mismo store, motor nuevo: los fingerprints no dependen del proceso
    let store = std::mem::take(orch.artifact_store_mut());
    let h2 = Harness::new();
    let mut orch2 = h2.orchestrator(store);
    assert!(orch2.run(&RunConfig::new()).unwrap().all_cache_hits());
    assert_eq!(h2.counts(), vec![0, 0, 0, 0]);
}

#[test]
fn changing_last_step_config_only_reruns_last_step() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    orch.run(&RunConfig::new()).unwrap();

    let cfg = RunConfig::new().with_override("similarity", json!({"offset": 0.5}));
    let out = orch.run(&cfg).unwrap();
    assert_eq!(statuses(&out), vec![H, H, H, S]);
    assert_eq!(h.counts(), vec![1, 1, 1, 2]);
}

#[test]
fn changing_middle_step_invalidates_downstream_only() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    orch.run(&RunConfig::new()).unwrap();

    let cfg = RunConfig::new().with_override("fit", json!({"scale": 2.0}));
    let out = orch.run(&cfg).unwrap();
    assert_eq!(statuses(&out), vec![H, S, S, S]);
    assert_eq!(h.counts(), vec![1, 2, 2, 2]);

    // volver a la configuración original reutiliza la primera versión
    let back = orch.run(&RunConfig::new()).unwrap();
    assert!(back.all_cache_hits());
}

#[test]
fn failed_step_aborts_run_and_leaves_no_valid_artifact() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    let cfg = RunConfig::new().with_override("features", json!({"fail": true}));

    let err = orch.run(&cfg).unwrap_err();
    match &err {
        CoreEngineError::StepExecution { step_id, message } => {
            assert_eq!(step_id, "features");
            assert!(message.contains("feature extraction exploded"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(h.counts(), vec![1, 1, 1, 0], "similarity must not run after a failure");
    // load + fit persistidos, nada de features ni similarity
    assert_eq!(orch.artifact_store().len(), 2);

    // los steps previos exitosos siguen siendo válidos
    let ok = orch.run(&RunConfig::new()).unwrap();
    assert_eq!(statuses(&ok), vec![H, H, S, S]);
}

#[test]
fn failed_run_is_visible_in_replayed_status() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    let cfg = RunConfig::new().with_override("features", json!({"fail": true}));
    assert!(orch.run(&cfg).is_err());

    let run_id = orch.event_store().inner.keys().next().copied().unwrap();
    let instance = orch.run_status(run_id);
    let st: Vec<StepStatus> = instance.steps.iter().map(|s| s.status).collect();
    assert_eq!(st, vec![S, S, X, P]);
    assert!(!instance.completed);
    assert_eq!(instance.cursor, 3);
}

#[test]
fn invalid_config_is_rejected_before_any_step_runs() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());

    let unknown = RunConfig::new().with_override("nope", json!({}));
    assert!(matches!(orch.run(&unknown), Err(CoreEngineError::InvalidArgument(_))));

    let bad_type = RunConfig::new().with_override("similarity", json!({"offset": "high"}));
    assert!(matches!(orch.run(&bad_type), Err(CoreEngineError::InvalidArgument(_))));
    assert_eq!(h.counts(), vec![0, 0, 0, 0]);
    assert!(orch.event_store().inner.is_empty());
}

#[test]
fn cancellation_stops_at_step_boundary() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    let token = CancellationToken::new();
    token.cancel();
    let err = orch.run(&RunConfig::new().with_cancellation(token)).unwrap_err();
    assert_eq!(err, CoreEngineError::Cancelled { completed_steps: 0 });
    assert_eq!(h.counts(), vec![0, 0, 0, 0]);

    let run_id = orch.event_store().inner.keys().next().copied().unwrap();
    let events = orch.events_for(run_id);
    assert!(matches!(events.last().map(|e| &e.kind), Some(RunEventKind::RunCancelled { completed_steps: 0 })));
    assert!(orch.run_status(run_id).cancelled);
}

#[test]
fn tampered_cache_entry_is_recomputed() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    let first = orch.run(&RunConfig::new()).unwrap();
    let fp = first.artifact("features").unwrap().fingerprint.clone();

    orch.artifact_store_mut().entry_mut("features", &fp).unwrap().fingerprint = "stale".into();
    let out = orch.run(&RunConfig::new()).unwrap();
    // el fingerprint de features no cambia, así que similarity sigue en cache
    assert_eq!(statuses(&out), vec![H, H, S, H]);
    assert!(orch.artifact_store().contains("features", ArtifactFormat::Array, &fp));
}

#[test]
fn evicted_artifact_is_rebuilt() {
    let h = Harness::new();
    let mut orch = h.orchestrator(InMemoryArtifactStore::new());
    orch.run(&RunConfig::new()).unwrap();
    orch.artifact_store_mut().evict("model");
    let out = orch.run(&RunConfig::new()).unwrap();
    assert_eq!(statuses(&out), vec![H, S, H, H]);
}
