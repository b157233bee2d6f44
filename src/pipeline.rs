//! End-to-end workflow: analysis, artifacts, and the final run bundle.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{check_integrability_conditions, compute_analytical_statistics};
use crate::artifacts::{
    build_artifact_manifest, export_run_manifest, generate_figures, generate_tables,
    ArtifactManifest,
};
use crate::benchmark::compare_with_feeder_benchmark;
use crate::config::{load_config, AnalysisConfig};
use crate::logging::{StatisticsSnapshot, StructuredLogger};
use crate::models::{BenchmarkComparison, IntegrabilityReport, MonteCarloResult, StatisticsRow};
use crate::monte_carlo::MonteCarloRunner;
use crate::AggregationError;

pub const RUN_MANIFEST_FILE: &str = "run_manifest.json";

/// Outputs of one analysis, before any files other than logs are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub run_id: String,
    pub config: AnalysisConfig,
    pub integrability: IntegrabilityReport,
    pub analytical: Vec<StatisticsRow>,
    pub monte_carlo: MonteCarloResult,
    pub benchmark: BenchmarkComparison,
    pub log_path: PathBuf,
    pub stats_log_path: PathBuf,
}

/// Final, immutable record of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBundle {
    #[serde(flatten)]
    pub run: AnalysisRun,
    pub artifacts: ArtifactManifest,
    pub run_manifest_path: PathBuf,
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Runs the analytical path, the Monte Carlo path, and their comparison.
pub fn analyze(config: &AnalysisConfig) -> Result<AnalysisRun, AggregationError> {
    config.validate()?;
    let started = Instant::now();

    let run_id = Uuid::new_v4().to_string();
    let logger = StructuredLogger::new(run_id.clone(), &config.log_dir)?;
    logger.log_event(
        "analysis",
        "start",
        "ok",
        0,
        "pipeline::analyze",
        "Analysis workflow started.",
        None,
    )?;
    info!("run {}: analysis started", logger.run_id());

    let integrability = check_integrability_conditions(config);
    let analytical = compute_analytical_statistics(config)?;
    let monte_carlo = MonteCarloRunner::new(config.clone()).run(config.monte_carlo_samples)?;
    let benchmark = compare_with_feeder_benchmark(&analytical, &monte_carlo.statistics_frame);

    logger.log_statistics(&StatisticsSnapshot::from_frame(
        &monte_carlo.statistics_frame,
    ))?;
    logger.log_event(
        "analysis",
        "complete",
        "ok",
        elapsed_ms(started),
        "pipeline::analyze",
        "Analysis workflow completed.",
        None,
    )?;
    info!(
        "run {run_id}: {} benchmark rows, integrability: {}",
        benchmark.rows.len(),
        integrability.details
    );

    Ok(AnalysisRun {
        log_path: logger.run_log_path().to_path_buf(),
        stats_log_path: logger.stats_log_path().to_path_buf(),
        run_id,
        config: config.clone(),
        integrability,
        analytical,
        monte_carlo,
        benchmark,
    })
}

/// Writes all manuscript tables and placeholder figures for `run`.
pub fn generate_artifacts(
    run: &AnalysisRun,
    output_dir: &Path,
) -> Result<ArtifactManifest, AggregationError> {
    let mut paths = generate_tables(run, output_dir)?;
    paths.extend(generate_figures(output_dir)?);
    Ok(build_artifact_manifest(&paths))
}

/// Loads configuration, analyzes, writes artifacts and the run manifest.
pub fn run_pipeline(
    config_path: Option<&Path>,
    output_dir: &Path,
) -> Result<RunBundle, AggregationError> {
    let config = AnalysisConfig {
        output_dir: output_dir.to_path_buf(),
        ..load_config(config_path)?
    };

    let run = analyze(&config)?;
    let artifacts = generate_artifacts(&run, output_dir)?;
    let bundle = RunBundle {
        run,
        artifacts,
        run_manifest_path: output_dir.join(RUN_MANIFEST_FILE),
    };
    export_run_manifest(&bundle, &bundle.run_manifest_path)?;
    info!(
        "run {}: {} artifacts, manifest {}",
        bundle.run.run_id,
        bundle.artifacts.len(),
        bundle.run_manifest_path.display()
    );

    Ok(bundle)
}
