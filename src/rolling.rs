//! # Rolling statistics
//! Fixed-size sliding windows over a user's daily history.
//!
//! History series are ordered oldest → newest. A "3-day" average means the
//! last three stored entries (T-1, T-2, T-3); a "7-day" average uses all seven.

/// Number of days kept per history series.
pub const WINDOW_DAYS: usize = 7;

/// Arithmetic mean over the last `n` values (all values if `n` exceeds the length).
///
/// Returns `0.0` for an empty slice.
pub fn mean_last(values: &[f64], n: usize) -> f64 {
    let start = values.len().saturating_sub(n);
    let tail = &values[start..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Population standard deviation (divides by `N`, not `N - 1`).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Append `next` to `history` and keep only the newest `len` values.
pub fn slide(history: &[f64], next: f64, len: usize) -> Vec<f64> {
    let mut all = Vec::with_capacity(history.len() + 1);
    all.extend_from_slice(history);
    all.push(next);
    let start = all.len().saturating_sub(len);
    all.split_off(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_last_uses_tail_only() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((mean_last(&v, 3) - 4.0).abs() < 1e-12);
        assert!((mean_last(&v, 10) - 3.0).abs() < 1e-12);
        assert_eq!(mean_last(&[], 3), 0.0);
    }

    #[test]
    fn population_std_matches_hand_computation() {
        // mean 5, squared deviations 9+1+1+9 = 20, /4 = 5
        let v = [2.0, 4.0, 6.0, 8.0];
        assert!((population_std(&v) - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(population_std(&[3.0; 7]), 0.0);
    }

    #[test]
    fn slide_drops_oldest() {
        let hist = [420.0, 425.0, 430.0, 420.0, 435.0, 420.0, 425.0];
        let w = slide(&hist, 420.0, WINDOW_DAYS);
        assert_eq!(w, vec![425.0, 430.0, 420.0, 435.0, 420.0, 425.0, 420.0]);
    }

    #[test]
    fn slide_keeps_everything_when_short() {
        let w = slide(&[1.0, 2.0], 3.0, WINDOW_DAYS);
        assert_eq!(w, vec![1.0, 2.0, 3.0]);
    }
}
