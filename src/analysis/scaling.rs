use crate::analysis::analytical::compute_analytical_statistics;
use crate::config::AnalysisConfig;
use crate::models::ScalingRow;
use crate::AggregationError;

/// Frequency-averaged analytical RMS at each candidate density.
pub fn evaluate_scaling_laws(
    config: &AnalysisConfig,
    densities: &[f64],
    coherence: f64,
) -> Result<Vec<ScalingRow>, AggregationError> {
    densities
        .iter()
        .map(|&density| {
            let scaled = config.with_density_and_coherence(density, coherence)?;
            let rows = compute_analytical_statistics(&scaled)?;
            let mean_rms_abs_v =
                rows.iter().map(|row| row.rms_abs_v).sum::<f64>() / rows.len() as f64;

            Ok(ScalingRow {
                density,
                coherence,
                mean_rms_abs_v,
                sqrt_density: density.sqrt(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_density() {
        let densities = [5.0, 10.0, 20.0];
        let rows = evaluate_scaling_laws(&AnalysisConfig::default(), &densities, 0.0)
            .expect("valid densities");
        assert_eq!(rows.len(), densities.len());
        assert_eq!(rows[0].density, 5.0);
        assert_eq!(rows[2].sqrt_density, 20.0_f64.sqrt());
    }

    #[test]
    fn incoherent_rms_grows_with_square_root_of_density() {
        let rows = evaluate_scaling_laws(&AnalysisConfig::default(), &[4.0, 16.0], 0.0)
            .expect("valid densities");
        let ratio = rows[1].mean_rms_abs_v / rows[0].mean_rms_abs_v;
        assert!((ratio - 2.0).abs() < 1e-9, "ratio was {ratio}");
    }

    #[test]
    fn nonpositive_density_is_a_configuration_error() {
        assert!(evaluate_scaling_laws(&AnalysisConfig::default(), &[10.0, 0.0], 0.0).is_err());
    }
}
