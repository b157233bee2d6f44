//! Plain records shared by the analytical and Monte Carlo paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Percentile levels summarized in every Monte Carlo row.
pub const DEFAULT_PERCENTILES: [u32; 3] = [90, 95, 99];

/// Per-frequency statistics of the aggregate voltage magnitude.
///
/// Both paths emit this schema so rows can be joined by frequency. The
/// analytical path leaves the sample-based fields empty.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRow {
    pub frequency_khz: f64,
    pub mean_abs_v: f64,
    pub var_v: f64,
    pub rms_abs_v: f64,
    #[serde(default)]
    pub p90_abs_v: Option<f64>,
    #[serde(default)]
    pub p95_abs_v: Option<f64>,
    #[serde(default)]
    pub p99_abs_v: Option<f64>,
    #[serde(default)]
    pub exceedance_probability: Option<f64>,
    #[serde(default)]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub density_scaling: Option<f64>,
}

impl StatisticsRow {
    /// Row carrying only the closed-form moments.
    pub fn from_moments(frequency_khz: f64, mean_abs_v: f64, var_v: f64, rms_abs_v: f64) -> Self {
        Self {
            frequency_khz,
            mean_abs_v,
            var_v,
            rms_abs_v,
            p90_abs_v: None,
            p95_abs_v: None,
            p99_abs_v: None,
            exceedance_probability: None,
            sample_size: None,
            density_scaling: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailMetrics {
    pub percentiles: BTreeMap<u32, f64>,
    /// Absent when no threshold was requested or there were no samples
    pub exceedance_probability: Option<f64>,
    pub sample_size: usize,
}

impl TailMetrics {
    pub fn percentile(&self, level: u32) -> Option<f64> {
        self.percentiles.get(&level).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrabilityReport {
    pub finite_domain_ok: bool,
    pub asymptotic_domain_ok: bool,
    pub details: String,
}

impl IntegrabilityReport {
    pub fn is_ok(&self) -> bool {
        self.finite_domain_ok && self.asymptotic_domain_ok
    }
}

/// Raw Monte Carlo magnitudes for one frequency, in trial order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySamples {
    pub frequency_khz: f64,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub per_frequency_samples: Vec<FrequencySamples>,
    pub statistics_frame: Vec<StatisticsRow>,
}

impl MonteCarloResult {
    pub fn samples_for(&self, frequency_khz: f64) -> Option<&[f64]> {
        self.per_frequency_samples
            .iter()
            .find(|entry| entry.frequency_khz == frequency_khz)
            .map(|entry| entry.samples.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub frequency_khz: f64,
    pub relative_error_rms: f64,
    pub relative_error_p95: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub rows: Vec<BenchmarkRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingRow {
    pub density: f64,
    pub coherence: f64,
    pub mean_rms_abs_v: f64,
    pub sqrt_density: f64,
}
