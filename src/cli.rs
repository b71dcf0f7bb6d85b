//! CLI mínima: parseo de argumentos y ejecución de comandos.
//!
//! ```text
//! recoflow run [--data <PATH>] [--strategy <S>] [--dry-run]
//! recoflow recommend --id <ID> [--k <K>] [--data <PATH>] [--strategy <S>]
//! recoflow recommend-batch --ids 1,2,3 [--k <K>] [--data <PATH>] [--strategy <S>]
//! ```
//!
//! Cada comando devuelve un `serde_json::Value` que `main` imprime.
use std::path::PathBuf;

use log::info;
use reco_adapters::steps::SimilarityParams;
use reco_adapters::{default_pipeline, recommender_from_outcome, JsonFileSource, PipelineOptions};
use reco_core::{Orchestrator, RunConfig, RunOutcome};
use reco_domain::{Recommender, SimilarityStrategy};
use reco_store::FsArtifactStore;
use serde_json::{json, Map, Value};

use crate::config::{parse_k, AppConfig};
use crate::errors::AppError;

pub const USAGE: &str = "Uso:
  recoflow run [--data <PATH>] [--strategy cosine|dot|jaccard|euclidean] [--dry-run]
  recoflow recommend --id <ID> [--k <K>] [--data <PATH>] [--strategy <S>]
  recoflow recommend-batch --ids <ID,ID,...> [--k <K>] [--data <PATH>] [--strategy <S>]";

/// Opciones comunes a todos los comandos que necesitan el pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineArgs {
    pub data: Option<PathBuf>,
    pub strategy: Option<SimilarityStrategy>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run { pipeline: PipelineArgs, dry_run: bool },
    Recommend { pipeline: PipelineArgs, id: i64, k: Option<usize> },
    RecommendBatch { pipeline: PipelineArgs, ids: Vec<i64>, k: Option<usize> },
}

/// `args` sin el nombre del programa.
pub fn parse_args(args: &[String]) -> Result<Command, AppError> {
    let Some((command, rest)) = args.split_first() else {
        return Err(AppError::Usage("missing command".into()));
    };
    let mut pipeline = PipelineArgs::default();
    let mut dry_run = false;
    let mut id: Option<i64> = None;
    let mut ids: Option<Vec<i64>> = None;
    let mut k: Option<usize> = None;

    let mut i = 0;
    while i < rest.len() {
        let flag = rest[i].as_str();
        let mut value = || {
            i += 1;
            rest.get(i).map(String::as_str).ok_or_else(|| AppError::Usage(format!("{flag} requires a value")))
        };
        match flag {
            "--data" => pipeline.data = Some(PathBuf::from(value()?)),
            "--strategy" => pipeline.strategy = Some(SimilarityStrategy::parse(value()?)?),
            "--id" => id = Some(parse_id(value()?)?),
            "--ids" => ids = Some(value()?.split(',').filter(|s| !s.trim().is_empty()).map(parse_id).collect::<Result<_, _>>()?),
            "--k" => k = Some(parse_k(value()?)?),
            "--dry-run" => dry_run = true,
            other => return Err(AppError::Usage(format!("unknown option '{other}'"))),
        }
        i += 1;
    }

    match command.as_str() {
        "run" => Ok(Command::Run { pipeline, dry_run }),
        "recommend" => {
            let id = id.ok_or_else(|| AppError::Usage("recommend requires --id".into()))?;
            Ok(Command::Recommend { pipeline, id, k })
        }
        "recommend-batch" => match ids {
            Some(ids) if !ids.is_empty() => Ok(Command::RecommendBatch { pipeline, ids, k }),
            _ => Err(AppError::Usage("recommend-batch requires --ids".into())),
        },
        other => Err(AppError::Usage(format!("unknown command '{other}'"))),
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::Usage(format!("invalid id '{raw}'")))
}

pub fn execute(command: &Command, config: &AppConfig) -> Result<Value, AppError> {
    match command {
        Command::Run { pipeline, dry_run: true } => {
            let orch = build_pipeline(pipeline, config)?;
            let plan = orch.plan(&RunConfig::new())?;
            Ok(json!({ "plan": plan }))
        }
        Command::Run { pipeline, dry_run: false } => {
            let outcome = run_pipeline(pipeline, config)?;
            let artifacts: Map<String, Value> =
                outcome.artifacts
                       .iter()
                       .map(|(name, a)| (name.clone(), json!({ "fingerprint": a.fingerprint, "location": a.location })))
                       .collect();
            Ok(json!({
                "run_id": outcome.run_id.to_string(),
                "run_fingerprint": outcome.run_fingerprint,
                "steps": outcome.steps,
                "artifacts": artifacts,
            }))
        }
        Command::Recommend { pipeline, id, k } => {
            let k = k.unwrap_or(config.default_k);
            let recommender = recommender_from_outcome(&run_pipeline(pipeline, config)?)?;
            let recommendations = recommender.recommend(*id, k)?;
            Ok(json!({ "id": id, "k": k, "recommendations": recommendations }))
        }
        Command::RecommendBatch { pipeline, ids, k } => {
            let k = k.unwrap_or(config.default_k);
            let recommender = recommender_from_outcome(&run_pipeline(pipeline, config)?)?;
            // un error por id no aborta el batch
            let results: Vec<Value> = recommender.recommend_batch(ids, k)?
                                                 .into_iter()
                                                 .map(|(id, result)| match result {
                                                     Ok(recs) => json!({ "id": id, "recommendations": recs }),
                                                     Err(e) => json!({ "id": id, "error": e.to_string() }),
                                                 })
                                                 .collect();
            Ok(json!({ "k": k, "results": results }))
        }
    }
}

fn build_pipeline(args: &PipelineArgs, config: &AppConfig) -> Result<Orchestrator<FsArtifactStore>, AppError> {
    let data = args.data
                   .clone()
                   .or_else(|| config.data_path.clone())
                   .ok_or_else(|| AppError::Config("no dataset: pass --data or set RECOFLOW_DATA_PATH".into()))?;
    let store = FsArtifactStore::from_config(&config.store)?;
    let options = PipelineOptions { similarity: SimilarityParams { strategy: args.strategy.unwrap_or(config.strategy) },
                                    ..Default::default() };
    Ok(default_pipeline(JsonFileSource::new(data), store, options)?)
}

fn run_pipeline(args: &PipelineArgs, config: &AppConfig) -> Result<RunOutcome, AppError> {
    let mut orch = build_pipeline(args, config)?;
    let outcome = orch.run(&RunConfig::new())?;
    info!("run {} finished: executed={:?} fingerprint={}",
          outcome.run_id,
          outcome.executed_steps(),
          outcome.run_fingerprint);
    Ok(outcome)
}
