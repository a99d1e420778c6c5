//! Small numeric helpers: percentile computation.

/// Linear-interpolation quantile over the finite values of `values`.
///
/// Matches the convention used by most spreadsheet/statistics tooling:
/// the quantile position is `q * (n - 1)` over the sorted sample, with
/// linear interpolation between the neighbouring order statistics.
///
/// Returns `None` when no finite values remain or `q` is outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }

    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_single_value_is_itself() {
        assert_eq!(quantile(&[4.25], 0.70), Some(4.25));
    }

    #[test]
    fn quantile_interpolates_linearly() {
        // pos = 0.7 * 4 = 2.8 -> 3 + 0.8 * (4 - 3) = 3.8
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let q = quantile(&v, 0.70).unwrap();
        assert!((q - 3.8).abs() < 1e-12);

        // pos = 0.1 * 3 = 0.3 -> 1 + 0.3 * (2 - 1) = 1.3
        let v = [4.0, 2.0, 1.0, 3.0];
        let q = quantile(&v, 0.10).unwrap();
        assert!((q - 1.3).abs() < 1e-12);
    }

    #[test]
    fn quantile_ignores_non_finite_values() {
        let v = [1.0, f64::NAN, 2.0, f64::INFINITY, 3.0];
        let q = quantile(&v, 0.5).unwrap();
        assert!((q - 2.0).abs() < 1e-12);
    }

    #[test]
    fn quantile_empty_or_bad_q_is_none() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[f64::NAN], 0.5), None);
        assert_eq!(quantile(&[1.0], 1.5), None);
    }
}
