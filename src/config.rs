use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::AggregationError;

/// Top-level analysis configuration.
///
/// Missing or null keys in a config file take the value from
/// `AnalysisConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct AnalysisConfig {
    /// Harmonic frequencies to evaluate [kHz]
    pub frequencies_khz: Vec<f64>,
    /// Source intensity [sources / km^2]
    pub density: f64,
    /// Radius of the disk sources are scattered over [m]
    pub region_radius_m: f64,
    /// Phase coherence across sources within one trial, in [0, 1]
    pub coherence: f64,
    /// Nominal source current amplitude [A]
    pub base_current_a: f64,
    /// Shunt admittance at each source [S]
    pub admittance_s: f64,
    /// Kernel attenuation coefficient [1/km]
    pub kernel_alpha: f64,
    pub resonance_scale: f64,
    /// Voltage magnitude used for exceedance probability
    pub threshold: f64,
    pub monte_carlo_samples: usize,
    /// Any integer; reinterpreted bit for bit as the generator's `u64` seed
    pub seed: i64,
    pub log_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// On-disk shape of `AnalysisConfig`, where every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    frequencies_khz: Option<Vec<f64>>,
    density: Option<f64>,
    region_radius_m: Option<f64>,
    coherence: Option<f64>,
    base_current_a: Option<f64>,
    admittance_s: Option<f64>,
    kernel_alpha: Option<f64>,
    resonance_scale: Option<f64>,
    threshold: Option<f64>,
    monte_carlo_samples: Option<usize>,
    seed: Option<i64>,
    log_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl From<ConfigFile> for AnalysisConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            frequencies_khz: file.frequencies_khz.unwrap_or(defaults.frequencies_khz),
            density: file.density.unwrap_or(defaults.density),
            region_radius_m: file.region_radius_m.unwrap_or(defaults.region_radius_m),
            coherence: file.coherence.unwrap_or(defaults.coherence),
            base_current_a: file.base_current_a.unwrap_or(defaults.base_current_a),
            admittance_s: file.admittance_s.unwrap_or(defaults.admittance_s),
            kernel_alpha: file.kernel_alpha.unwrap_or(defaults.kernel_alpha),
            resonance_scale: file.resonance_scale.unwrap_or(defaults.resonance_scale),
            threshold: file.threshold.unwrap_or(defaults.threshold),
            monte_carlo_samples: file
                .monte_carlo_samples
                .unwrap_or(defaults.monte_carlo_samples),
            seed: file.seed.unwrap_or(defaults.seed),
            log_dir: file.log_dir.unwrap_or(defaults.log_dir),
            output_dir: file.output_dir.unwrap_or(defaults.output_dir),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frequencies_khz: vec![2.0, 10.0, 30.0, 75.0, 150.0],
            density: 12.0,
            region_radius_m: 500.0,
            coherence: 0.0,
            base_current_a: 1.0,
            admittance_s: 0.01,
            kernel_alpha: 0.8,
            resonance_scale: 0.05,
            threshold: 1.0,
            monte_carlo_samples: 128,
            seed: 7,
            log_dir: PathBuf::from("logs"),
            output_dir: PathBuf::from("manuscript/artifacts"),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AggregationError> {
        if self.frequencies_khz.is_empty() {
            return Err(AggregationError::InvalidConfig(
                "frequencies_khz must not be empty".to_string(),
            ));
        }

        // NaN fails every ordered comparison, so `!(x > 0.0)` rejects it too.
        if self.frequencies_khz.iter().any(|&freq| !(freq > 0.0)) {
            return Err(AggregationError::InvalidConfig(
                "frequencies_khz must be positive".to_string(),
            ));
        }

        if !(self.density > 0.0) {
            return Err(AggregationError::InvalidConfig(
                "density must be positive".to_string(),
            ));
        }

        if !(self.region_radius_m > 0.0) {
            return Err(AggregationError::InvalidConfig(
                "region_radius_m must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.coherence) {
            return Err(AggregationError::InvalidConfig(
                "coherence must be between 0 and 1".to_string(),
            ));
        }

        if self.monte_carlo_samples == 0 {
            return Err(AggregationError::InvalidConfig(
                "monte_carlo_samples must be positive".to_string(),
            ));
        }

        if !(self.kernel_alpha > 0.0) {
            return Err(AggregationError::InvalidConfig(
                "kernel_alpha must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Copy of this configuration with a different density and coherence, validated.
    pub fn with_density_and_coherence(
        &self,
        density: f64,
        coherence: f64,
    ) -> Result<Self, AggregationError> {
        let config = Self {
            density,
            coherence,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON object, ignoring unknown keys, and validates the result.
    pub fn from_json_str(raw: &str) -> Result<Self, AggregationError> {
        let payload: serde_json::Value = serde_json::from_str(raw)?;
        if !payload.is_object() {
            return Err(AggregationError::InvalidConfig(
                "configuration JSON must be an object".to_string(),
            ));
        }

        let config: Self = serde_json::from_value(payload)?;
        config.validate()?;
        Ok(config)
    }
}

pub fn default_config() -> AnalysisConfig {
    AnalysisConfig::default()
}

/// Loads a configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, AggregationError> {
    let Some(path) = path else {
        return Ok(default_config());
    };

    if !path.exists() {
        return Err(AggregationError::ConfigNotFound(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path)?;
    AnalysisConfig::from_json_str(&raw)
}

pub fn save_config(config: &AnalysisConfig, path: &Path) -> Result<PathBuf, AggregationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(path.to_path_buf())
}
