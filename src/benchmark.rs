use std::collections::HashMap;

use crate::models::{BenchmarkComparison, BenchmarkRow, StatisticsRow};

const MIN_DENOMINATOR: f64 = 1e-9;

fn relative_error(estimate: f64, reference: f64) -> f64 {
    (estimate - reference).abs() / reference.abs().max(MIN_DENOMINATOR)
}

/// Keys rows by the exact bit pattern of their frequency; a later duplicate wins.
fn index_by_frequency(rows: &[StatisticsRow]) -> HashMap<u64, &StatisticsRow> {
    rows.iter()
        .map(|row| (row.frequency_khz.to_bits(), row))
        .collect()
}

/// Relative RMS and p95 errors of the analytical rows against the simulated
/// ones, over frequencies present in both frames, in ascending frequency order.
///
/// Frequencies are matched by exact equality. A missing p95 falls back to the
/// row's RMS on either side.
pub fn compare_with_feeder_benchmark(
    analytical: &[StatisticsRow],
    simulated: &[StatisticsRow],
) -> BenchmarkComparison {
    let analytical_idx = index_by_frequency(analytical);
    let simulated_idx = index_by_frequency(simulated);

    let mut shared: Vec<(&StatisticsRow, &StatisticsRow)> = analytical_idx
        .iter()
        .filter_map(|(key, a_row)| simulated_idx.get(key).map(|s_row| (*a_row, *s_row)))
        .collect();
    shared.sort_by(|(a, _), (b, _)| a.frequency_khz.total_cmp(&b.frequency_khz));

    let rows = shared
        .into_iter()
        .map(|(a_row, s_row)| {
            let a_p95 = a_row.p95_abs_v.unwrap_or(a_row.rms_abs_v);
            let s_p95 = s_row.p95_abs_v.unwrap_or(s_row.rms_abs_v);
            BenchmarkRow {
                frequency_khz: a_row.frequency_khz,
                relative_error_rms: relative_error(a_row.rms_abs_v, s_row.rms_abs_v),
                relative_error_p95: relative_error(a_p95, s_p95),
            }
        })
        .collect();

    BenchmarkComparison { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(frequency_khz: f64, rms_abs_v: f64, p95_abs_v: Option<f64>) -> StatisticsRow {
        StatisticsRow {
            p95_abs_v,
            ..StatisticsRow::from_moments(frequency_khz, 0.0, 0.0, rms_abs_v)
        }
    }

    #[test]
    fn reference_frames_give_expected_relative_errors() {
        let analytical = [row(10.0, 1.2, Some(1.8)), row(30.0, 1.5, Some(2.1))];
        let simulated = [row(10.0, 1.0, Some(1.6)), row(30.0, 1.7, Some(2.2))];
        let comparison = compare_with_feeder_benchmark(&analytical, &simulated);

        assert_eq!(comparison.rows.len(), 2);
        assert_eq!(comparison.rows[0].frequency_khz, 10.0);
        assert!((comparison.rows[0].relative_error_rms - 0.2).abs() < 1e-12);
        assert!((comparison.rows[1].relative_error_rms - 0.2 / 1.7).abs() < 1e-12);
        assert!((comparison.rows[1].relative_error_rms - 0.1176).abs() < 1e-4);
        assert!((comparison.rows[0].relative_error_p95 - 0.2 / 1.6).abs() < 1e-12);
        assert!((comparison.rows[1].relative_error_p95 - 0.1 / 2.2).abs() < 1e-12);
    }

    #[test]
    fn unmatched_frequencies_are_dropped_and_output_is_sorted() {
        let analytical = [row(75.0, 1.0, None), row(2.0, 1.0, None), row(10.0, 1.0, None)];
        let simulated = [row(10.0, 2.0, None), row(75.0, 2.0, None), row(150.0, 2.0, None)];
        let comparison = compare_with_feeder_benchmark(&analytical, &simulated);
        let freqs: Vec<f64> = comparison.rows.iter().map(|r| r.frequency_khz).collect();
        assert_eq!(freqs, vec![10.0, 75.0]);
    }

    #[test]
    fn missing_analytical_p95_falls_back_to_rms() {
        let comparison = compare_with_feeder_benchmark(
            &[row(10.0, 1.5, None)],
            &[row(10.0, 1.0, Some(2.0))],
        );
        assert!((comparison.rows[0].relative_error_p95 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn zero_reference_is_floored_not_divided() {
        let comparison =
            compare_with_feeder_benchmark(&[row(10.0, 1e-9, None)], &[row(10.0, 0.0, None)]);
        let err = comparison.rows[0].relative_error_rms;
        assert!(err.is_finite());
        assert!((err - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_frames_compare_to_nothing() {
        let comparison =
            compare_with_feeder_benchmark(&[row(10.0, 1.0, None)], &[row(10.5, 1.0, None)]);
        assert!(comparison.rows.is_empty());
    }
}
