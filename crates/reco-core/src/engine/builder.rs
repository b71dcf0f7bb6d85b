//! Builder para `Orchestrator`.
//!
//! `OrchestratorBuilderInit` contiene los stores; `first_step` transiciona a
//! `OrchestratorBuilder`, que acumula steps en orden. `build` valida las
//! dependencias declaradas (cada input es output de un step anterior o un
//! artifact externo declarado con `expect_external`).
//!
//! ```ignore
//! let orchestrator = Orchestrator::new(store)
//!     .first_step(LoadDataStep::new(source))
//!     .add_step(FitVectorizerStep::default())
//!     .build()?;
//! ```

use crate::engine::Orchestrator;
use crate::errors::CoreEngineError;
use crate::event::EventStore;
use crate::repo::{build_pipeline_definition, RunRepository};
use crate::step::StepDefinition;
use crate::store::ArtifactStore;

/// Estado inicial del builder: sólo stores.
#[derive(Debug)]
pub struct OrchestratorBuilderInit<S: ArtifactStore, E: EventStore, R: RunRepository> {
    pub artifact_store: S,
    pub event_store: E,
    pub repository: R,
}

impl<S: ArtifactStore, E: EventStore, R: RunRepository> OrchestratorBuilderInit<S, E, R> {
    /// Define el primer step y transiciona al builder completo.
    #[inline]
    pub fn first_step<T>(self, step: T) -> OrchestratorBuilder<S, E, R>
        where T: StepDefinition + 'static
    {
        OrchestratorBuilder { artifact_store: self.artifact_store,
                              event_store: self.event_store,
                              repository: self.repository,
                              steps: vec![Box::new(step)],
                              externals: Vec::new() }
    }
}

#[derive(Debug)]
pub struct OrchestratorBuilder<S: ArtifactStore, E: EventStore, R: RunRepository> {
    artifact_store: S,
    event_store: E,
    repository: R,
    steps: Vec<Box<dyn StepDefinition>>,
    externals: Vec<String>,
}

impl<S: ArtifactStore, E: EventStore, R: RunRepository> OrchestratorBuilder<S, E, R> {
    #[inline]
    pub fn add_step<T>(mut self, next: T) -> Self
        where T: StepDefinition + 'static
    {
        self.steps.push(Box::new(next));
        self
    }

    pub fn add_boxed_step(mut self, next: Box<dyn StepDefinition>) -> Self {
        self.steps.push(next);
        self
    }

    /// Declara un artifact que provee el entorno en cada `RunConfig`.
    pub fn expect_external(mut self, name: impl Into<String>) -> Self {
        self.externals.push(name.into());
        self
    }

    /// Construye el orquestador; falla si la secuencia de steps no respeta
    /// las dependencias declaradas.
    pub fn build(self) -> Result<Orchestrator<S, E, R>, CoreEngineError> {
        let definition = build_pipeline_definition(self.steps);
        Orchestrator::with_definition(self.artifact_store,
                                      self.event_store,
                                      self.repository,
                                      definition,
                                      self.externals)
    }
}
