//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to one decimal place, returning `None` for non-finite values.
#[must_use]
pub fn round_to_tenth(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    Some((value * 10.0).round() / 10.0)
}

/// Round a f64 and clamp it to the i64 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert i32 to f64 losslessly.
#[must_use]
pub fn i32_to_f64(value: i32) -> f64 {
    f64::from(value)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Keep only finite, strictly positive values.
#[must_use]
pub fn positive_finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Arithmetic mean, `None` for an empty iterator.
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / usize_to_f64(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenths_round_half_away_from_zero() {
        assert_eq!(round_to_tenth(13.333), Some(13.3));
        assert_eq!(round_to_tenth(99.96), Some(100.0));
        assert_eq!(round_to_tenth(f64::NAN), None);
    }

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i64(17.5), 18);
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::MAX), i64::MAX);
    }

    #[test]
    fn positive_finite_filters_degenerate_values() {
        assert_eq!(positive_finite(Some(1.5)), Some(1.5));
        assert_eq!(positive_finite(Some(0.0)), None);
        assert_eq!(positive_finite(Some(-2.0)), None);
        assert_eq!(positive_finite(Some(f64::INFINITY)), None);
        assert_eq!(positive_finite(None), None);
    }

    #[test]
    fn mean_handles_empty_input() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
    }
}
