//! Transfer impedance models between a source and the PCC.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

pub const MIN_DISTANCE_M: f64 = 1e-9;
pub const MIN_MAGNITUDE: f64 = 1e-9;

pub trait PropagationKernel {
    /// Complex transfer impedance at `frequency_khz` for a source `distance_m` from the PCC.
    fn impedance(&self, frequency_khz: f64, distance_m: f64) -> Complex64;
}

impl<K: PropagationKernel + ?Sized> PropagationKernel for &K {
    fn impedance(&self, frequency_khz: f64, distance_m: f64) -> Complex64 {
        (**self).impedance(frequency_khz, distance_m)
    }
}

impl<K: PropagationKernel + ?Sized> PropagationKernel for Box<K> {
    fn impedance(&self, frequency_khz: f64, distance_m: f64) -> Complex64 {
        (**self).impedance(frequency_khz, distance_m)
    }
}

/// Exponential attenuation with a weak sinusoidal resonance in frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialKernel {
    /// Attenuation per kilometre
    pub alpha: f64,
    pub resonance_scale: f64,
}

impl ExponentialKernel {
    pub fn new(alpha: f64, resonance_scale: f64) -> Self {
        Self {
            alpha,
            resonance_scale,
        }
    }
}

impl PropagationKernel for ExponentialKernel {
    fn impedance(&self, frequency_khz: f64, distance_m: f64) -> Complex64 {
        let distance_km = distance_m.max(MIN_DISTANCE_M) / 1000.0;
        let attenuation = (-self.alpha * distance_km).exp();
        let resonance = 1.0 + self.resonance_scale * (frequency_khz / 12.5).sin();
        let phase = frequency_khz * 0.0025 * distance_km;
        let magnitude = (attenuation * resonance).max(MIN_MAGNITUDE);
        Complex64::new(phase.cos(), phase.sin()) * magnitude
    }
}
