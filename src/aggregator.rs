use num_complex::Complex64;

use crate::kernel::PropagationKernel;
use crate::population::SourcePopulation;

/// Below this the shunt denominator is treated as a resonance and the source is dropped.
pub const MIN_SHUNT_DENOMINATOR: f64 = 1e-12;

/// Sums source contributions at the PCC through a propagation kernel.
#[derive(Debug, Clone)]
pub struct SupraharmonicAggregator<K> {
    kernel: K,
}

impl<K: PropagationKernel> SupraharmonicAggregator<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    pub fn aggregate_complex_voltage(
        &self,
        frequency_khz: f64,
        population: &SourcePopulation,
    ) -> Complex64 {
        population
            .iter()
            .filter_map(|source| {
                let mark = &source.mark;
                let current = Complex64::from_polar(mark.amplitude_a, mark.phase_rad);
                let z_tr = self.kernel.impedance(frequency_khz, source.distance_m);
                let denominator = 1.0 + z_tr * mark.admittance_s;
                if denominator.norm() < MIN_SHUNT_DENOMINATOR {
                    return None;
                }
                Some(z_tr * current / denominator)
            })
            .fold(Complex64::new(0.0, 0.0), |total, contribution| total + contribution)
    }

    pub fn aggregate_magnitude(&self, frequency_khz: f64, population: &SourcePopulation) -> f64 {
        self.aggregate_complex_voltage(frequency_khz, population)
            .norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ExponentialKernel;
    use crate::population::{generate_source_population, PopulationParams, Source, SourceMark};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source(distance_m: f64, amplitude_a: f64, phase_rad: f64, admittance_s: f64) -> Source {
        Source {
            distance_m,
            mark: SourceMark {
                amplitude_a,
                phase_rad,
                admittance_s,
            },
        }
    }

    fn population(sources: Vec<Source>) -> SourcePopulation {
        SourcePopulation {
            sources,
            common_phase_rad: 0.0,
        }
    }

    /// Returns a fixed impedance regardless of frequency and distance.
    struct ConstantKernel(Complex64);

    impl PropagationKernel for ConstantKernel {
        fn impedance(&self, _frequency_khz: f64, _distance_m: f64) -> Complex64 {
            self.0
        }
    }

    #[test]
    fn magnitude_is_the_norm_of_the_complex_voltage() {
        let aggregator = SupraharmonicAggregator::new(ExponentialKernel::new(0.5, 0.0));
        let pop = population(vec![
            source(50.0, 1.0, 0.0, 0.01),
            source(120.0, 0.8, 1.0, 0.01),
        ]);
        let value = aggregator.aggregate_complex_voltage(10.0, &pop);
        assert_eq!(aggregator.aggregate_magnitude(10.0, &pop), value.norm());
    }

    #[test]
    fn magnitude_matches_norm_for_sampled_populations() {
        let aggregator = SupraharmonicAggregator::new(ExponentialKernel::new(0.8, 0.05));
        let params = PopulationParams {
            density: 12.0,
            region_radius_m: 500.0,
            coherence: 0.2,
            base_current_a: 1.0,
            admittance_s: 0.01,
        };
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let pop = generate_source_population(&params, &mut rng);
            for &freq in &[2.0, 10.0, 150.0] {
                let value = aggregator.aggregate_complex_voltage(freq, &pop);
                assert_eq!(aggregator.aggregate_magnitude(freq, &pop), value.norm());
            }
        }
    }

    #[test]
    fn empty_population_aggregates_to_zero() {
        let aggregator = SupraharmonicAggregator::new(ExponentialKernel::new(0.8, 0.05));
        let pop = population(Vec::new());
        assert_eq!(aggregator.aggregate_magnitude(30.0, &pop), 0.0);
    }

    #[test]
    fn shunt_divides_each_contribution() {
        let aggregator = SupraharmonicAggregator::new(ConstantKernel(Complex64::new(2.0, 0.0)));
        let pop = population(vec![source(10.0, 3.0, 0.0, 0.5)]);
        // z * I / (1 + Y z) = 2 * 3 / (1 + 0.5 * 2)
        let value = aggregator.aggregate_complex_voltage(1.0, &pop);
        assert!((value.re - 3.0).abs() < 1e-12);
        assert!(value.im.abs() < 1e-12);
    }

    #[test]
    fn opposite_phases_cancel() {
        let aggregator = SupraharmonicAggregator::new(ConstantKernel(Complex64::new(1.0, 0.0)));
        let pop = population(vec![
            source(10.0, 1.0, 0.0, 0.0),
            source(10.0, 1.0, std::f64::consts::PI, 0.0),
        ]);
        assert!(aggregator.aggregate_magnitude(1.0, &pop) < 1e-12);
    }

    #[test]
    fn resonant_sources_are_skipped() {
        // 1 + Y z = 1 + 1 * (-1) = 0
        let aggregator = SupraharmonicAggregator::new(ConstantKernel(Complex64::new(-1.0, 0.0)));
        let resonant = population(vec![
            source(10.0, 1.0, 0.0, 1.0),
            source(20.0, 2.0, 0.0, 0.0),
        ]);
        let value = aggregator.aggregate_complex_voltage(1.0, &resonant);
        assert!(value.re.is_finite() && value.im.is_finite());
        assert!((value.re + 2.0).abs() < 1e-12);
    }
}
