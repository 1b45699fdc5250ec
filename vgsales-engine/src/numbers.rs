//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Interpret a decimal cell as a calendar year, rejecting fractional or non-finite values.
///
/// Tabular exports frequently store years as `2006.0`; both forms are accepted.
#[must_use]
pub fn year_from_f64(value: f64) -> Option<i32> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    cast::<f64, i32>(value)
}

/// Express `part` as a percentage of `whole`, returning 0.0 when `whole` is not positive.
#[must_use]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if !whole.is_finite() || whole <= 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

/// Round a value to two decimals, returning 0.0 for non-finite values.
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Render a sales figure in millions with two decimals, e.g. `82.74 million`.
#[must_use]
pub fn format_millions(value: f64) -> String {
    format!("{value:.2} million")
}

/// Scale `value` against `max` onto `0..=width` character cells.
#[must_use]
pub fn scaled_width(value: f64, max: f64, width: usize) -> usize {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let ratio = (value / max).min(1.0);
    let cells = (ratio * count_to_f64(width)).round();
    cast::<f64, usize>(cells).unwrap_or(0).min(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_accept_integral_decimals_only() {
        assert_eq!(year_from_f64(2006.0), Some(2006));
        assert_eq!(year_from_f64(2006.5), None);
        assert_eq!(year_from_f64(f64::NAN), None);
    }

    #[test]
    fn percent_handles_empty_whole() {
        assert!((percent_of(1.0, 4.0) - 25.0).abs() < f64::EPSILON);
        assert!(percent_of(3.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn formatting_uses_two_decimals() {
        assert_eq!(format_millions(82.74), "82.74 million");
        assert_eq!(format_millions(0.5), "0.50 million");
        assert!((round_hundredths(69.787_449) - 69.79).abs() < 1e-9);
    }

    #[test]
    fn scaled_width_clamps() {
        assert_eq!(scaled_width(50.0, 100.0, 40), 20);
        assert_eq!(scaled_width(500.0, 100.0, 40), 40);
        assert_eq!(scaled_width(1.0, 0.0, 40), 0);
    }
}
