use std::collections::BTreeMap;

use crate::models::TailMetrics;

/// Linear interpolation between adjacent order statistics; `q` is a fraction in [0, 1].
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let position = q * (n - 1) as f64;
            let lo = (position.floor() as usize).min(n - 1);
            let hi = (lo + 1).min(n - 1);
            let weight = position - lo as f64;
            sorted[lo] * (1.0 - weight) + sorted[hi] * weight
        }
    }
}

pub fn compute_tail_metrics(
    samples: &[f64],
    percentiles: &[u32],
    threshold: Option<f64>,
) -> TailMetrics {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let percentiles: BTreeMap<u32, f64> = percentiles
        .iter()
        .map(|&level| (level, quantile(&sorted, f64::from(level) / 100.0)))
        .collect();

    let exceedance_probability = match threshold {
        Some(threshold) if !sorted.is_empty() => {
            let exceeding = sorted.iter().filter(|&&value| value > threshold).count();
            Some(exceeding as f64 / sorted.len() as f64)
        }
        _ => None,
    };

    TailMetrics {
        percentiles,
        exceedance_probability,
        sample_size: sorted.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sample_percentiles_and_exceedance() {
        let tail = compute_tail_metrics(&[0.2, 0.4, 0.6, 0.8, 1.0], &[90, 95], Some(0.5));
        assert_eq!(tail.sample_size, 5);
        assert_eq!(tail.exceedance_probability, Some(0.6));
        let p90 = tail.percentile(90).expect("p90");
        let p95 = tail.percentile(95).expect("p95");
        assert!(p95 >= p90);
        assert!((p90 - 0.92).abs() < 1e-12);
        assert!((p95 - 0.96).abs() < 1e-12);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = compute_tail_metrics(&[1.4, 0.1, 0.9, 0.5, 0.2], &[50, 90], Some(0.7));
        let b = compute_tail_metrics(&[0.1, 0.2, 0.5, 0.9, 1.4], &[50, 90], Some(0.7));
        assert_eq!(a, b);
        assert_eq!(a.percentile(50), Some(0.5));
    }

    #[test]
    fn percentiles_are_monotone_in_level() {
        let samples: Vec<f64> = (0..97).map(|i| ((i * 37) % 97) as f64 * 0.13).collect();
        let levels: Vec<u32> = (0..=100).collect();
        let tail = compute_tail_metrics(&samples, &levels, None);
        let values: Vec<f64> = tail.percentiles.values().copied().collect();
        assert!(values.windows(2).all(|pair| pair[1] >= pair[0]));
        assert_eq!(tail.percentile(0), Some(0.0));
        assert_eq!(tail.percentile(100), Some(96.0 * 0.13));
    }

    #[test]
    fn empty_samples_give_zero_percentiles_and_no_exceedance() {
        let tail = compute_tail_metrics(&[], &[90, 95, 99], Some(1.0));
        assert_eq!(tail.sample_size, 0);
        assert!(tail.percentiles.values().all(|&value| value == 0.0));
        assert_eq!(tail.exceedance_probability, None);
    }

    #[test]
    fn single_sample_is_every_percentile() {
        let tail = compute_tail_metrics(&[3.5], &[1, 50, 99], Some(3.5));
        assert!(tail.percentiles.values().all(|&value| value == 3.5));
        // strictly greater than
        assert_eq!(tail.exceedance_probability, Some(0.0));
    }

    #[test]
    fn no_threshold_means_no_exceedance() {
        let tail = compute_tail_metrics(&[0.1, 0.2], &[95], None);
        assert_eq!(tail.exceedance_probability, None);
    }
}
