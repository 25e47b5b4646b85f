//! Evenly spaced parameter sweeps.
//!
//! Each parameter is swept independently across its own range; the
//! resulting sequences line up by index, not by value.

/// A numeric kind a sweep can produce.
///
/// Interpolation always happens in `f64`; the kind decides how the
/// interpolated value is cast back.
pub trait SweepValue: Copy {
    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;
}

impl SweepValue for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    /// Truncates toward zero.
    fn from_f64(value: f64) -> Self {
        value as i64
    }
}

impl SweepValue for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// `n` values linearly interpolated from `min` to `max` inclusive.
///
/// `n <= 1` yields just `min`.
pub fn spaced_values<T: SweepValue>(min: T, max: T, n: usize) -> Vec<T> {
    if n <= 1 {
        return vec![min];
    }

    let lo = min.to_f64();
    let step = (max.to_f64() - lo) / (n - 1) as f64;
    (0..n).map(|i| T::from_f64(lo + i as f64 * step)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_value_is_min() {
        assert_eq!(spaced_values(225i64, 240, 1), vec![225]);
        assert_eq!(spaced_values(0.2f64, 0.9, 1), vec![0.2]);
    }

    #[test]
    fn test_zero_count_is_treated_as_one() {
        assert_eq!(spaced_values(6i64, 14, 0), vec![6]);
    }

    #[test]
    fn test_integer_sweep_truncates() {
        // step = 15 / 11 = 1.3636..
        let values = spaced_values(225i64, 240, 12);
        assert_eq!(
            &values[..11],
            &[225, 226, 227, 229, 230, 231, 233, 234, 235, 237, 238]
        );
        assert!(values[11] == 239 || values[11] == 240);

        assert_eq!(spaced_values(225i64, 240, 4), vec![225, 230, 235, 240]);
    }

    #[test]
    fn test_float_sweep_hits_both_ends() {
        let values = spaced_values(0.18f64, 0.30, 4);
        assert_eq!(values.len(), 4);
        assert!((values[0] - 0.18).abs() < 1e-12);
        assert!((values[1] - 0.22).abs() < 1e-12);
        assert!((values[3] - 0.30).abs() < 1e-12);
    }

    #[test]
    fn test_descending_range() {
        assert_eq!(spaced_values(10i64, 4, 4), vec![10, 8, 6, 4]);
    }

    proptest! {
        #[test]
        fn prop_int_sweep_is_monotonic_with_exact_ends(
            min in -1000i64..1000,
            span in 0i64..1000,
            n in 2usize..64,
        ) {
            let max = min + span;
            let values = spaced_values(min, max, n);
            prop_assert_eq!(values.len(), n);
            prop_assert_eq!(values[0], min);
            // the last step can land a hair under `max` before truncation
            prop_assert!((values[n - 1] - max).abs() <= 1);
            for pair in values.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }

        #[test]
        fn prop_float_sweep_is_monotonic_with_exact_ends(
            min in -10.0f64..10.0,
            span in 0.0f64..10.0,
            n in 2usize..64,
        ) {
            let max = min + span;
            let values = spaced_values(min, max, n);
            prop_assert_eq!(values.len(), n);
            prop_assert!((values[0] - min).abs() < 1e-12);
            prop_assert!((values[n - 1] - max).abs() < 1e-9);
            for pair in values.windows(2) {
                prop_assert!(pair[0] <= pair[1] + 1e-12);
            }
        }

        #[test]
        fn prop_single_value_is_always_min(min in -1000i64..1000, max in -1000i64..1000) {
            prop_assert_eq!(spaced_values(min, max, 1), vec![min]);
        }
    }
}
