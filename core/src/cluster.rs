//! Splits observed keying durations into short and long clusters.

use crate::{CLUSTER_SPLIT_RATIO, FALLBACK_UNIT_MS};

/// Estimate the base (dit) duration from a set of observed durations.
///
/// Keying durations become bimodal once both dits and dahs have been
/// seen. Sorting and scanning for the largest adjacent ratio finds the
/// short/long boundary at any absolute speed, so no pre-trained
/// threshold is needed; the mean of the short cluster is the dit length.
/// Uniform input (a sender who has only keyed dits so far) has no clear
/// split and falls back to the median, the lower-middle element for even
/// counts.
pub fn estimate_unit(durations: &[f64]) -> f64 {
    match durations {
        [] => FALLBACK_UNIT_MS,
        [single] => *single,
        _ => {
            let mut sorted = durations.to_vec();
            sorted.sort_by(f64::total_cmp);

            let mut max_ratio = 0.0;
            let mut split = 0;
            for i in 0..sorted.len() - 1 {
                let ratio = sorted[i + 1] / sorted[i];
                if ratio > max_ratio {
                    max_ratio = ratio;
                    split = i + 1;
                }
            }

            if max_ratio > CLUSTER_SPLIT_RATIO && split > 0 {
                let short = &sorted[..split];
                short.iter().sum::<f64>() / short.len() as f64
            } else {
                sorted[(sorted.len() - 1) / 2]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_uses_fallback() {
        assert_eq!(estimate_unit(&[]), FALLBACK_UNIT_MS);
    }

    #[test]
    fn single_value_is_returned_as_is() {
        assert_eq!(estimate_unit(&[73.0]), 73.0);
        assert_eq!(estimate_unit(&[350.0]), 350.0);
    }

    #[test]
    fn bimodal_input_returns_short_cluster_mean() {
        // 300/100 = 3.0 is the largest adjacent ratio, splitting at index 3
        let unit = estimate_unit(&[100.0, 100.0, 100.0, 300.0, 300.0, 300.0]);
        assert_eq!(unit, 100.0);
    }

    #[test]
    fn bimodal_input_is_order_independent() {
        let unit = estimate_unit(&[300.0, 100.0, 300.0, 100.0]);
        assert_eq!(unit, 100.0);
    }

    #[test]
    fn unimodal_input_returns_median() {
        // No adjacent ratio exceeds 1.5; lower-middle of [95, 100, 105, 110]
        assert_eq!(estimate_unit(&[100.0, 110.0, 105.0, 95.0]), 100.0);
    }

    #[test]
    fn odd_count_unimodal_returns_middle() {
        assert_eq!(estimate_unit(&[95.0, 100.0, 105.0]), 100.0);
    }

    #[test]
    fn ratio_exactly_at_limit_is_not_a_split() {
        // 150/100 = 1.5 is not strictly greater than the split ratio
        assert_eq!(estimate_unit(&[100.0, 150.0]), 100.0);
    }
}
