//! Poisson source populations scattered over a disk around the PCC.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Upper bound on the Poisson mean; keeps `exp(-lambda)` away from underflow.
pub const MAX_POISSON_MEAN: f64 = 500.0;
pub const MIN_AMPLITUDE_A: f64 = 1e-6;

/// Electrical attributes of one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceMark {
    pub amplitude_a: f64,
    pub phase_rad: f64,
    pub admittance_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub distance_m: f64,
    pub mark: SourceMark,
}

/// One trial's realization of the source field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePopulation {
    pub sources: Vec<Source>,
    /// Phase shared by all sources in proportion to the coherence
    pub common_phase_rad: f64,
}

impl SourcePopulation {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        self.sources.iter().map(|source| source.mark.amplitude_a).collect()
    }
}

impl<'a> IntoIterator for &'a SourcePopulation {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

/// Parameters of the marked point process, fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationParams {
    pub density: f64,
    pub region_radius_m: f64,
    pub coherence: f64,
    pub base_current_a: f64,
    pub admittance_s: f64,
}

impl PopulationParams {
    pub fn area_km2(&self) -> f64 {
        PI * (self.region_radius_m / 1000.0).powi(2)
    }

    pub fn expected_count(&self) -> f64 {
        self.density * self.area_km2()
    }
}

/// Poisson draw by multiplying uniforms until the product falls below `exp(-lambda)`.
pub fn sample_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> usize {
    if !(lambda > 0.0) {
        return 0;
    }

    let limit = (-lambda.min(MAX_POISSON_MEAN)).exp();
    let mut k = 0_usize;
    let mut product = 1.0_f64;
    while product > limit {
        k += 1;
        product *= rng.gen::<f64>();
    }

    k.saturating_sub(1)
}

fn sample_mark<R: Rng + ?Sized>(
    rng: &mut R,
    params: &PopulationParams,
    common_phase_rad: f64,
) -> SourceMark {
    let residual = Uniform::new(0.0, TAU).sample(rng);
    let phase_rad = params.coherence * common_phase_rad + (1.0 - params.coherence) * residual;
    let spread = Uniform::new(0.7, 1.3).sample(rng);

    SourceMark {
        amplitude_a: (params.base_current_a * spread).max(MIN_AMPLITUDE_A),
        phase_rad,
        admittance_s: params.admittance_s,
    }
}

/// Draws one trial's population. The generator is advanced, never reset, so
/// consecutive calls consume a population-size dependent amount of randomness.
pub fn generate_source_population<R: Rng + ?Sized>(
    params: &PopulationParams,
    rng: &mut R,
) -> SourcePopulation {
    let n_sources = sample_poisson(params.expected_count(), rng);
    let common_phase_rad = Uniform::new(0.0, TAU).sample(rng);

    let sources = (0..n_sources)
        .map(|_| {
            // sqrt of a uniform gives uniform placement by area, not by radius.
            let distance_m = params.region_radius_m * rng.gen::<f64>().sqrt();
            let mark = sample_mark(rng, params, common_phase_rad);
            Source { distance_m, mark }
        })
        .collect();

    SourcePopulation {
        sources,
        common_phase_rad,
    }
}
