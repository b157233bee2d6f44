//! Manuscript tables (CSV), placeholder figures, and manifests for a run.

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::analysis::scaling::evaluate_scaling_laws;
use crate::pipeline::{AnalysisRun, RunBundle};
use crate::AggregationError;

pub const TABLE_FILES: [&str; 6] = [
    "table_1_scenario_matrix.csv",
    "table_2_analytical_expressions.csv",
    "table_3_baseline_ppp_by_frequency.csv",
    "table_4_sensitivity_summary.csv",
    "table_5_feeder_benchmark_spec.csv",
    "table_6_analytical_vs_feeder_metrics.csv",
];

pub const FIGURE_FILES: [&str; 8] = [
    "figure_1_transfer_impedance_vs_distance.png",
    "figure_2_rms_vs_density.png",
    "figure_3_percentile_design_curves.png",
    "figure_4_ccdf_ppp_cluster_repulsive.png",
    "figure_5_phase_coherence_sweep.png",
    "figure_6_inhomogeneous_intensity_outcomes.png",
    "figure_7_feeder_validation_scatter.png",
    "figure_8_allowable_density_screening_chart.png",
];

/// Density multipliers for the sensitivity table.
const SENSITIVITY_FACTORS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

/// 1x1 transparent PNG.
const MINIMAL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
    0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0xE2, 0x21, 0xBC, 0x33, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub tables: Vec<PathBuf>,
    pub figures: Vec<PathBuf>,
}

impl ArtifactManifest {
    pub fn len(&self) -> usize {
        self.tables.len() + self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.figures.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.tables.iter().chain(self.figures.iter())
    }
}

fn fmt_f64(value: f64) -> String {
    format!("{value:.10}")
}

fn fmt_option_f64(value: Option<f64>) -> String {
    value.map(fmt_f64).unwrap_or_default()
}

fn ensure_dir(output_dir: &Path) -> Result<(), AggregationError> {
    fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Splits artifact paths into tables and figures by extension; others are ignored.
pub fn build_artifact_manifest<P: AsRef<Path>>(paths: &[P]) -> ArtifactManifest {
    let mut manifest = ArtifactManifest::default();
    for path in paths {
        let path = path.as_ref();
        let suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match suffix.as_str() {
            "csv" | "tex" => manifest.tables.push(path.to_path_buf()),
            "png" | "pdf" | "svg" => manifest.figures.push(path.to_path_buf()),
            _ => {}
        }
    }
    manifest
}

pub fn generate_tables(
    run: &AnalysisRun,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, AggregationError> {
    ensure_dir(output_dir)?;
    let paths: Vec<PathBuf> = TABLE_FILES.iter().map(|name| output_dir.join(name)).collect();

    write_scenario_matrix(&paths[0], run)?;
    write_analytical_table(&paths[1], run)?;
    write_monte_carlo_table(&paths[2], run)?;
    write_sensitivity_table(&paths[3], run)?;
    write_benchmark_spec(&paths[4], run)?;
    write_benchmark_table(&paths[5], run)?;

    Ok(paths)
}

pub fn generate_figures(output_dir: &Path) -> Result<Vec<PathBuf>, AggregationError> {
    ensure_dir(output_dir)?;
    FIGURE_FILES
        .iter()
        .map(|name| {
            let path = output_dir.join(name);
            fs::write(&path, MINIMAL_PNG)?;
            Ok(path)
        })
        .collect()
}

/// Writes the final bundle as pretty JSON and returns the path.
pub fn export_run_manifest(bundle: &RunBundle, path: &Path) -> Result<PathBuf, AggregationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(bundle)?)?;
    Ok(path.to_path_buf())
}

fn write_scenario_matrix(path: &Path, run: &AnalysisRun) -> Result<(), AggregationError> {
    let config = &run.config;
    let frequencies = config
        .frequencies_khz
        .iter()
        .map(|freq| freq.to_string())
        .collect::<Vec<_>>()
        .join(";");

    let mut writer = Writer::from_path(path)?;
    writer.write_record(["parameter", "value"])?;
    for (name, value) in [
        ("run_id", run.run_id.clone()),
        ("frequencies_khz", frequencies),
        ("density", fmt_f64(config.density)),
        ("region_radius_m", fmt_f64(config.region_radius_m)),
        ("coherence", fmt_f64(config.coherence)),
        ("base_current_a", fmt_f64(config.base_current_a)),
        ("admittance_s", fmt_f64(config.admittance_s)),
        ("kernel_alpha", fmt_f64(config.kernel_alpha)),
        ("resonance_scale", fmt_f64(config.resonance_scale)),
        ("threshold", fmt_f64(config.threshold)),
        ("monte_carlo_samples", config.monte_carlo_samples.to_string()),
        ("seed", config.seed.to_string()),
    ] {
        writer.write_record([name.to_string(), value])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_analytical_table(path: &Path, run: &AnalysisRun) -> Result<(), AggregationError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "frequency_khz",
        "mean_abs_v",
        "var_v",
        "rms_abs_v",
        "density_scaling",
    ])?;

    for row in &run.analytical {
        writer.write_record([
            fmt_f64(row.frequency_khz),
            fmt_f64(row.mean_abs_v),
            fmt_f64(row.var_v),
            fmt_f64(row.rms_abs_v),
            fmt_option_f64(row.density_scaling),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_monte_carlo_table(path: &Path, run: &AnalysisRun) -> Result<(), AggregationError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "frequency_khz",
        "mean_abs_v",
        "var_v",
        "rms_abs_v",
        "p90_abs_v",
        "p95_abs_v",
        "p99_abs_v",
        "exceedance_probability",
        "sample_size",
    ])?;

    for row in &run.monte_carlo.statistics_frame {
        writer.write_record([
            fmt_f64(row.frequency_khz),
            fmt_f64(row.mean_abs_v),
            fmt_f64(row.var_v),
            fmt_f64(row.rms_abs_v),
            fmt_option_f64(row.p90_abs_v),
            fmt_option_f64(row.p95_abs_v),
            fmt_option_f64(row.p99_abs_v),
            fmt_option_f64(row.exceedance_probability),
            row.sample_size.map(|n| n.to_string()).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_sensitivity_table(path: &Path, run: &AnalysisRun) -> Result<(), AggregationError> {
    let densities: Vec<f64> = SENSITIVITY_FACTORS
        .iter()
        .map(|factor| factor * run.config.density)
        .collect();
    let rows = evaluate_scaling_laws(&run.config, &densities, run.config.coherence)?;

    let mut writer = Writer::from_path(path)?;
    writer.write_record(["density", "coherence", "mean_rms_abs_v", "sqrt_density"])?;
    for row in &rows {
        writer.write_record([
            fmt_f64(row.density),
            fmt_f64(row.coherence),
            fmt_f64(row.mean_rms_abs_v),
            fmt_f64(row.sqrt_density),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_benchmark_spec(path: &Path, run: &AnalysisRun) -> Result<(), AggregationError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["parameter", "value"])?;
    for (name, value) in [
        ("rows_analytical", run.analytical.len().to_string()),
        (
            "rows_monte_carlo",
            run.monte_carlo.statistics_frame.len().to_string(),
        ),
        ("rows_benchmark", run.benchmark.rows.len().to_string()),
        ("monte_carlo_samples", run.config.monte_carlo_samples.to_string()),
        ("seed", run.config.seed.to_string()),
        ("finite_domain_ok", run.integrability.finite_domain_ok.to_string()),
        (
            "asymptotic_domain_ok",
            run.integrability.asymptotic_domain_ok.to_string(),
        ),
    ] {
        writer.write_record([name.to_string(), value])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_benchmark_table(path: &Path, run: &AnalysisRun) -> Result<(), AggregationError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["frequency_khz", "relative_error_rms", "relative_error_p95"])?;
    for row in &run.benchmark.rows {
        writer.write_record([
            fmt_f64(row.frequency_khz),
            fmt_f64(row.relative_error_rms),
            fmt_f64(row.relative_error_p95),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
