//! Supraharmonic aggregation at a point of common coupling (PCC).
//!
//! Many independent harmonic current sources, scattered as a Poisson point
//! process over a disk, each inject a current that reaches the PCC through a
//! distance- and frequency-dependent transfer impedance. This crate estimates
//! the statistics of the aggregate voltage two ways, with a closed-form
//! approximation and with a seeded Monte Carlo simulation, then compares them.

pub mod aggregator;
pub mod analysis;
pub mod artifacts;
pub mod benchmark;
pub mod config;
pub mod kernel;
pub mod logging;
pub mod models;
pub mod monte_carlo;
pub mod pipeline;
pub mod population;

use std::path::PathBuf;

use thiserror::Error;

pub use aggregator::SupraharmonicAggregator;
pub use analysis::{
    check_integrability_conditions, compute_analytical_statistics, compute_tail_metrics,
    evaluate_scaling_laws,
};
pub use benchmark::compare_with_feeder_benchmark;
pub use config::{default_config, load_config, save_config, AnalysisConfig};
pub use kernel::{ExponentialKernel, PropagationKernel};
pub use models::{
    BenchmarkComparison, BenchmarkRow, FrequencySamples, IntegrabilityReport, MonteCarloResult,
    ScalingRow, StatisticsRow, TailMetrics,
};
pub use monte_carlo::MonteCarloRunner;
pub use pipeline::{analyze, generate_artifacts, run_pipeline, AnalysisRun, RunBundle};
pub use population::{generate_source_population, Source, SourceMark, SourcePopulation};

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
}
