//! Runs the default analysis and prints the analytical and simulated RMS side by side.
//!
//! `cargo run --example quickstart`

use supraharmonic_aggregation::{
    check_integrability_conditions, compare_with_feeder_benchmark,
    compute_analytical_statistics, default_config, MonteCarloRunner,
};

fn main() -> anyhow::Result<()> {
    let config = default_config();
    let report = check_integrability_conditions(&config);
    println!("{}", report.details);

    let analytical = compute_analytical_statistics(&config)?;
    let simulated = MonteCarloRunner::new(config.clone()).run(config.monte_carlo_samples)?;
    let benchmark = compare_with_feeder_benchmark(&analytical, &simulated.statistics_frame);

    println!("f_khz  rms_analytical  rms_monte_carlo  p95_monte_carlo  rel_err_rms");
    for ((a, s), b) in analytical
        .iter()
        .zip(&simulated.statistics_frame)
        .zip(&benchmark.rows)
    {
        println!(
            "{:>5.1}  {:>14.6}  {:>15.6}  {:>15.6}  {:>11.4}",
            a.frequency_khz,
            a.rms_abs_v,
            s.rms_abs_v,
            s.p95_abs_v.unwrap_or(0.0),
            b.relative_error_rms
        );
    }

    Ok(())
}
