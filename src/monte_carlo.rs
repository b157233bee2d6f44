//! Seeded Monte Carlo estimate of the aggregate voltage distribution.
//!
//! Every trial draws one source population and evaluates it at all configured
//! frequencies, so the harmonics of a trial share one spatial and phase
//! realization. Trials run strictly in order against a single `StdRng`; the
//! same configuration and seed always reproduce the same samples bit for bit.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::aggregator::SupraharmonicAggregator;
use crate::analysis::tail::compute_tail_metrics;
use crate::config::AnalysisConfig;
use crate::kernel::{ExponentialKernel, PropagationKernel};
use crate::models::{FrequencySamples, MonteCarloResult, StatisticsRow, DEFAULT_PERCENTILES};
use crate::population::{generate_source_population, PopulationParams};
use crate::AggregationError;

pub struct MonteCarloRunner<K = ExponentialKernel> {
    config: AnalysisConfig,
    seed: i64,
    aggregator: SupraharmonicAggregator<K>,
}

impl MonteCarloRunner<ExponentialKernel> {
    /// Runner with the configured exponential kernel and the configured seed.
    pub fn new(config: AnalysisConfig) -> Self {
        let kernel = ExponentialKernel::new(config.kernel_alpha, config.resonance_scale);
        Self::with_kernel(config, kernel)
    }
}

impl<K: PropagationKernel> MonteCarloRunner<K> {
    pub fn with_kernel(config: AnalysisConfig, kernel: K) -> Self {
        let seed = config.seed;
        Self {
            config,
            seed,
            aggregator: SupraharmonicAggregator::new(kernel),
        }
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn run(&self, n_samples: usize) -> Result<MonteCarloResult, AggregationError> {
        self.config.validate()?;

        let config = &self.config;
        let params = PopulationParams {
            density: config.density,
            region_radius_m: config.region_radius_m,
            coherence: config.coherence,
            base_current_a: config.base_current_a,
            admittance_s: config.admittance_s,
        };
        info!(
            "monte carlo: {n_samples} trials, {} frequencies, seed {}, expected {:.2} sources per trial",
            config.frequencies_khz.len(),
            self.seed,
            params.expected_count()
        );

        let mut rng = StdRng::seed_from_u64(self.seed as u64);
        let mut per_frequency_samples: Vec<FrequencySamples> = config
            .frequencies_khz
            .iter()
            .map(|&frequency_khz| FrequencySamples {
                frequency_khz,
                samples: Vec::with_capacity(n_samples),
            })
            .collect();

        for trial in 0..n_samples {
            let population = generate_source_population(&params, &mut rng);
            debug!("trial {trial}: {} sources", population.len());

            for entry in &mut per_frequency_samples {
                entry.samples.push(
                    self.aggregator
                        .aggregate_magnitude(entry.frequency_khz, &population),
                );
            }
        }

        let statistics_frame = per_frequency_samples
            .iter()
            .map(|entry| summarize_samples(entry, config.threshold))
            .collect();

        Ok(MonteCarloResult {
            per_frequency_samples,
            statistics_frame,
        })
    }
}

/// Population mean and variance (divided by n), RMS, and tail metrics.
fn summarize_samples(entry: &FrequencySamples, threshold: f64) -> StatisticsRow {
    let values = &entry.samples;
    let tail = compute_tail_metrics(values, &DEFAULT_PERCENTILES, Some(threshold));

    let (mean_abs_v, var_v) = if values.is_empty() {
        (0.0, 0.0)
    } else {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n;
        (mean, var)
    };

    StatisticsRow {
        p90_abs_v: tail.percentile(90),
        p95_abs_v: tail.percentile(95),
        p99_abs_v: tail.percentile(99),
        exceedance_probability: tail.exceedance_probability,
        sample_size: Some(tail.sample_size),
        ..StatisticsRow::from_moments(
            entry.frequency_khz,
            mean_abs_v,
            var_v,
            (mean_abs_v.powi(2) + var_v).sqrt(),
        )
    }
}
