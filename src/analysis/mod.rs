//! Closed-form statistics, tail metrics, and model sanity checks.

pub mod analytical;
pub mod scaling;
pub mod tail;
pub mod validation;

pub use analytical::{compute_analytical_statistics, compute_analytical_statistics_with_kernel};
pub use scaling::evaluate_scaling_laws;
pub use tail::compute_tail_metrics;
pub use validation::check_integrability_conditions;
