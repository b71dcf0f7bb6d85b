//! Orquestador del pipeline.

use indexmap::IndexMap;
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use uuid::Uuid;

use super::builder::OrchestratorBuilderInit;
use super::run::{PlannedStep, RunConfig, RunOutcome, StepOutcome};
use crate::constants::ENGINE_VERSION;
use crate::errors::CoreEngineError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::injection::merge_json;
use crate::model::{Artifact, ArtifactFormat, ArtifactValue, ExecutionContext, InputFingerprint, OutputSpec,
                   StepFingerprintInput};
use crate::repo::{InMemoryRunRepository, PipelineDefinition, RunInstance, RunRepository};
use crate::step::{StepDefinition, StepRunResult};
use crate::store::ArtifactStore;

/// Motor de ejecución de pipelines con artifacts versionados.
///
/// Recorre la secuencia fija de steps, calcula el fingerprint de cada uno a
/// partir de los fingerprints de sus inputs y de sus params efectivos, y sólo
/// ejecuta los steps cuyo output no está ya en el store. Cada step se ejecuta
/// a lo sumo una vez por run; un fallo aborta el resto del run.
#[derive(Debug)]
pub struct Orchestrator<S, E = InMemoryEventStore, R = InMemoryRunRepository>
    where S: ArtifactStore,
          E: EventStore,
          R: RunRepository
{
    artifact_store: S,
    event_store: E,
    repository: R,
    definition: PipelineDefinition,
    externals: Vec<String>,
}

impl<S: ArtifactStore> Orchestrator<S> {
    /// Crea un builder con event log y repositorio en memoria.
    #[inline]
    pub fn new(artifact_store: S) -> OrchestratorBuilderInit<S, InMemoryEventStore, InMemoryRunRepository> {
        OrchestratorBuilderInit { artifact_store,
                                  event_store: InMemoryEventStore::default(),
                                  repository: InMemoryRunRepository::new() }
    }
}

impl<S, E, R> Orchestrator<S, E, R>
    where S: ArtifactStore,
          E: EventStore,
          R: RunRepository
{
    /// Crea un builder con los stores proporcionados.
    #[inline]
    pub fn builder(artifact_store: S, event_store: E, repository: R) -> OrchestratorBuilderInit<S, E, R> {
        OrchestratorBuilderInit { artifact_store,
                                  event_store,
                                  repository }
    }

    /// Crea el orquestador validando el orden de dependencias de la definición.
    pub fn with_definition(artifact_store: S,
                           event_store: E,
                           repository: R,
                           definition: PipelineDefinition,
                           externals: Vec<String>)
                           -> Result<Self, CoreEngineError> {
        let names: Vec<&str> = externals.iter().map(String::as_str).collect();
        definition.validate(&names)?;
        Ok(Self { artifact_store,
                  event_store,
                  repository,
                  definition,
                  externals })
    }

    pub fn definition(&self) -> &PipelineDefinition {
        &self.definition
    }

    pub fn artifact_store(&self) -> &S {
        &self.artifact_store
    }

    pub fn artifact_store_mut(&mut self) -> &mut S {
        &mut self.artifact_store
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn events_for(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Saca del log los eventos de un run ya terminado. Un orquestador de
    /// larga vida debe llamarlo tras consumir cada run; después de esto
    /// `run_status(run_id)` ya no tiene slots.
    pub fn take_events(&mut self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.drain(run_id)
    }

    /// Estado de un run reconstruido desde su log de eventos.
    pub fn run_status(&self, run_id: Uuid) -> RunInstance {
        let events = self.event_store.list(run_id);
        self.repository.load(run_id, &events, &self.definition)
    }

    /// Ejecuta el pipeline completo.
    ///
    /// La configuración se valida entera (overrides, params de cada step,
    /// artifacts externos) antes de ejecutar el primer step.
    pub fn run(&mut self, config: &RunConfig) -> Result<RunOutcome, CoreEngineError> {
        let params = self.resolve_params(config)?;
        let mut artifacts = self.external_artifacts(config)?;

        let run_id = Uuid::new_v4();
        self.event_store
            .append_kind(run_id,
                         RunEventKind::RunStarted { definition_hash: self.definition.definition_hash.clone(),
                                                    step_count: self.definition.len() });
        info!("run {run_id} started ({} steps)", self.definition.len());

        let mut step_fps: Vec<String> = Vec::with_capacity(self.definition.len());
        for (index, step) in self.definition.steps.iter().enumerate() {
            if config.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                self.event_store
                    .append_kind(run_id, RunEventKind::RunCancelled { completed_steps: index });
                warn!("run {run_id} cancelled before step '{}'", step.id());
                return Err(CoreEngineError::Cancelled { completed_steps: index });
            }

            let inputs = collect_inputs(step.as_ref(), &artifacts)?;
            let output = step.output();
            let fingerprint = step_fingerprint(step.as_ref(), &output, &inputs, &params[index]);
            step_fps.push(fingerprint.clone());

            if let Some(cached) = self.lookup_cached(step.id(), &output, &fingerprint) {
                debug!("step '{}' cache hit ({})", step.id(), short(&fingerprint));
                self.event_store.append_kind(run_id,
                                             RunEventKind::StepCacheHit { step_index: index,
                                                                          step_id: step.id().to_string(),
                                                                          output: output.name.clone(),
                                                                          fingerprint });
                artifacts.insert(output.name, cached);
                continue;
            }

            self.event_store.append_kind(run_id,
                                         RunEventKind::StepStarted { step_index: index,
                                                                     step_id: step.id().to_string(),
                                                                     fingerprint: fingerprint.clone() });
            debug!("step '{}' running ({})", step.id(), short(&fingerprint));

            let ctx = ExecutionContext { step_id: step.id().to_string(),
                                         inputs,
                                         params: params[index].clone() };
            match execute(&mut self.artifact_store, step.as_ref(), &ctx, &output, &fingerprint) {
                Ok(artifact) => {
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::StepFinished { step_index: index,
                                                                              step_id: step.id().to_string(),
                                                                              output: output.name.clone(),
                                                                              fingerprint });
                    artifacts.insert(output.name, artifact);
                }
                Err(err) => {
                    error!("step '{}' failed: {err}", step.id());
                    self.event_store.append_kind(run_id,
                                                 RunEventKind::StepFailed { step_index: index,
                                                                            step_id: step.id().to_string(),
                                                                            error: err.clone(),
                                                                            fingerprint });
                    return Err(CoreEngineError::StepExecution { step_id: step.id().to_string(),
                                                                message: err.to_string() });
                }
            }
        }

        let run_fingerprint = hash_value(&json!({
                                             "engine_version": ENGINE_VERSION,
                                             "definition_hash": self.definition.definition_hash,
                                             "step_fingerprints": step_fps,
                                         }));
        self.event_store
            .append_kind(run_id, RunEventKind::RunCompleted { run_fingerprint: run_fingerprint.clone() });

        let instance = self.run_status(run_id);
        let steps: Vec<StepOutcome> = instance.steps
                                              .into_iter()
                                              .map(|s| StepOutcome { step_id: s.step_id,
                                                                     status: s.status,
                                                                     fingerprint: s.fingerprint,
                                                                     output: s.output })
                                              .collect();
        let executed = steps.iter().filter(|s| s.status == crate::step::StepStatus::Succeeded).count();
        info!("run {run_id} completed: {executed} executed, {} from cache", steps.len() - executed);

        // Los externos no son outputs del run.
        artifacts.retain(|name, _| !self.externals.contains(name));
        Ok(RunOutcome { run_id,
                        run_fingerprint,
                        artifacts,
                        steps })
    }

    /// Dry-run: calcula los fingerprints de todos los steps sin ejecutar nada.
    ///
    /// Es posible porque el fingerprint de un step sólo depende de los
    /// fingerprints de sus inputs, no de su contenido.
    pub fn plan(&self, config: &RunConfig) -> Result<Vec<PlannedStep>, CoreEngineError> {
        let params = self.resolve_params(config)?;
        let mut fps: IndexMap<String, String> = self.external_artifacts(config)?
                                                    .into_iter()
                                                    .map(|(name, a)| (name, a.fingerprint))
                                                    .collect();
        let mut planned = Vec::with_capacity(self.definition.len());
        for (index, step) in self.definition.steps.iter().enumerate() {
            let mut inputs = Vec::new();
            for name in step.inputs() {
                let fingerprint = fps.get(&name)
                                     .cloned()
                                     .ok_or_else(|| CoreEngineError::MissingInput { step_id: step.id().to_string(),
                                                                                    artifact: name.clone() })?;
                inputs.push(InputFingerprint { name, fingerprint });
            }
            let output = step.output();
            let fingerprint = StepFingerprintInput { engine_version: ENGINE_VERSION,
                                                     step_id: step.id(),
                                                     output: &output,
                                                     inputs: &inputs,
                                                     params: &params[index] }.fingerprint();
            let cached = self.artifact_store.contains(&output.name, output.format, &fingerprint);
            fps.insert(output.name.clone(), fingerprint.clone());
            planned.push(PlannedStep { step_id: step.id().to_string(),
                                       output: output.name,
                                       fingerprint,
                                       cached });
        }
        Ok(planned)
    }

    /// Params efectivos por step (base + override), validados.
    fn resolve_params(&self, config: &RunConfig) -> Result<Vec<Value>, CoreEngineError> {
        if let Some(unknown) = config.overrides.keys().find(|id| self.definition.step(id).is_none()) {
            return Err(CoreEngineError::InvalidArgument(format!("override for unknown step '{unknown}'")));
        }
        let mut out = Vec::with_capacity(self.definition.len());
        for step in &self.definition.steps {
            // p.ej. la fuente de load_data no se puede leer: es fallo del step
            let base = step.base_params().map_err(|err| match err {
                                             CoreEngineError::StepExecution { .. } => err,
                                             other => {
                                                 error!("step '{}' failed resolving params: {other}", step.id());
                                                 CoreEngineError::StepExecution { step_id: step.id().to_string(),
                                                                                  message: other.to_string() }
                                             }
                                         })?;
            let effective = match config.overrides.get(step.id()) {
                Some(o) => merge_json(&base, o),
                None => base,
            };
            step.validate_params(&effective)?;
            out.push(effective);
        }
        Ok(out)
    }

    /// Artifacts del entorno, con fingerprint derivado de su contenido.
    fn external_artifacts(&self, config: &RunConfig) -> Result<IndexMap<String, Artifact>, CoreEngineError> {
        if let Some(missing) = self.externals.iter().find(|n| !config.external.contains_key(*n)) {
            return Err(CoreEngineError::InvalidArgument(format!("external artifact '{missing}' not provided")));
        }
        let mut out = IndexMap::new();
        for (name, value) in &config.external {
            if !self.externals.contains(name) {
                return Err(CoreEngineError::InvalidArgument(format!("unexpected external artifact '{name}'")));
            }
            let fingerprint = hash_value(&json!({ "external": name, "content": value.content_hash()? }));
            out.insert(name.clone(), Artifact::new(name.clone(), natural_format(value), fingerprint, value.clone()));
        }
        Ok(out)
    }

    /// Busca el output en el store. Cualquier inconsistencia cuenta como miss.
    fn lookup_cached(&self, step_id: &str, output: &OutputSpec, fingerprint: &str) -> Option<Artifact> {
        match self.artifact_store.load(&output.name, output.format, fingerprint) {
            Ok(Some(found)) if found.fingerprint == fingerprint => Some(found),
            Ok(Some(found)) => {
                warn!("step '{step_id}': stored '{}' has fingerprint {}, expected {}; recomputing",
                      output.name,
                      short(&found.fingerprint),
                      short(fingerprint));
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!("step '{step_id}': cache lookup failed, recomputing: {err}");
                None
            }
        }
    }
}

fn collect_inputs(step: &dyn StepDefinition,
                  artifacts: &IndexMap<String, Artifact>)
                  -> Result<IndexMap<String, Artifact>, CoreEngineError> {
    step.inputs()
        .into_iter()
        .map(|name| match artifacts.get(&name) {
            Some(a) => Ok((name, a.clone())),
            None => Err(CoreEngineError::MissingInput { step_id: step.id().to_string(),
                                                        artifact: name }),
        })
        .collect()
}

fn step_fingerprint(step: &dyn StepDefinition,
                    output: &OutputSpec,
                    inputs: &IndexMap<String, Artifact>,
                    params: &Value)
                    -> String {
    let input_fps: Vec<InputFingerprint> = inputs.values()
                                                 .map(|a| InputFingerprint { name: a.name.clone(),
                                                                             fingerprint: a.fingerprint.clone() })
                                                 .collect();
    StepFingerprintInput { engine_version: ENGINE_VERSION,
                           step_id: step.id(),
                           output,
                           inputs: &input_fps,
                           params }.fingerprint()
}

/// Ejecuta el step, valida la forma del output y lo persiste.
fn execute<S: ArtifactStore>(store: &mut S,
                             step: &dyn StepDefinition,
                             ctx: &ExecutionContext,
                             output: &OutputSpec,
                             fingerprint: &str)
                             -> Result<Artifact, CoreEngineError> {
    let value = match step.run(ctx) {
        StepRunResult::Success { output } => output,
        StepRunResult::Failure { error } => return Err(error),
    };
    output.format.check(&value)?;
    let mut artifact = Artifact::new(output.name.clone(), output.format, fingerprint, value);
    let location = store.save(&artifact)?;
    artifact.location = Some(location);
    Ok(artifact)
}

fn natural_format(value: &ArtifactValue) -> ArtifactFormat {
    match value {
        ArtifactValue::Document(_) => ArtifactFormat::Json,
        ArtifactValue::Object(_) => ArtifactFormat::Binary,
        ArtifactValue::Array(_) => ArtifactFormat::Array,
        ArtifactValue::Table(_) => ArtifactFormat::Table,
    }
}

fn short(fp: &str) -> &str {
    fp.get(..12).unwrap_or(fp)
}
