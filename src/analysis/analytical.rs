use crate::config::AnalysisConfig;
use crate::kernel::{ExponentialKernel, PropagationKernel};
use crate::models::StatisticsRow;
use crate::AggregationError;

/// Radial offsets used to average the kernel magnitude over the disk.
pub const KERNEL_RADIAL_SAMPLES: usize = 64;

/// Mean of `|Z(f, r)|` at `R/64, 2R/64, ..., R`.
pub fn kernel_mean_abs<K: PropagationKernel + ?Sized>(
    kernel: &K,
    frequency_khz: f64,
    region_radius_m: f64,
) -> f64 {
    let radius = region_radius_m.max(1.0);
    let total: f64 = (1..=KERNEL_RADIAL_SAMPLES)
        .map(|idx| {
            let distance_m = idx as f64 / KERNEL_RADIAL_SAMPLES as f64 * radius;
            kernel.impedance(frequency_khz, distance_m).norm()
        })
        .sum();
    total / KERNEL_RADIAL_SAMPLES as f64
}

/// Closed-form moments with the default exponential kernel.
pub fn compute_analytical_statistics(
    config: &AnalysisConfig,
) -> Result<Vec<StatisticsRow>, AggregationError> {
    let kernel = ExponentialKernel::new(config.kernel_alpha, config.resonance_scale);
    compute_analytical_statistics_with_kernel(config, &kernel)
}

/// Surrogate moments per frequency. The 0.1 mean factor and the variance form
/// are modeling conventions kept for comparability with earlier runs.
pub fn compute_analytical_statistics_with_kernel<K: PropagationKernel + ?Sized>(
    config: &AnalysisConfig,
    kernel: &K,
) -> Result<Vec<StatisticsRow>, AggregationError> {
    config.validate()?;

    let density_scaling = config.density.max(1e-9).sqrt();
    let rows = config
        .frequencies_khz
        .iter()
        .map(|&frequency_khz| {
            let k_mean = kernel_mean_abs(kernel, frequency_khz, config.region_radius_m);
            let mean_abs_v =
                config.base_current_a * k_mean * config.coherence * config.density * 0.1;
            let var_v = config.base_current_a.powi(2)
                * k_mean.powi(2)
                * (1.0 - config.coherence.powi(2))
                * config.density;
            let rms_abs_v = (var_v + mean_abs_v.powi(2)).max(0.0).sqrt();

            StatisticsRow {
                density_scaling: Some(density_scaling),
                ..StatisticsRow::from_moments(frequency_khz, mean_abs_v, var_v, rms_abs_v)
            }
        })
        .collect();

    Ok(rows)
}
