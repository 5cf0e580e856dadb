use crate::LdError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LdError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LdError::NonFinite { what, value: v })
    }
}

/// Arithmetic mean; an empty input averages to zero.
pub fn mean(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Real>() / values.len() as Real
}

/// Smallest and largest value, `None` for empty input.
pub fn min_max(values: &[Real]) -> Option<(Real, Real)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Fixed-point text with exact halves rounded away from zero, so
/// `format_fixed(14.25, 1)` is "14.3" where `{:.1}` gives "14.2".
pub fn format_fixed(value: Real, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scale = (10.0 as Real).powi(digits.min(15) as i32);
    let scaled = value.abs() * scale;
    if scaled.fract() == 0.5 {
        let magnitude = (scaled.trunc() + 1.0) / scale;
        return format!("{:.*}", digits, magnitude.copysign(value));
    }
    format!("{:.*}", digits, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn min_max_tracks_extremes() {
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
    }

    #[test]
    fn format_fixed_rounds_halves_up() {
        assert_eq!(format_fixed(14.25, 1), "14.3");
        assert_eq!(format!("{:.1}", 14.25), "14.2");
        assert_eq!(format_fixed(2.5, 0), "3");
        assert_eq!(format_fixed(12.5, 0), "13");
        assert_eq!(format_fixed(-14.25, 1), "-14.3");
        assert_eq!(format_fixed(41.666, 0), "42");
        assert_eq!(format_fixed(0.15 * 100.0, 0), "15");
        // 1.005 is stored just below the half, so it rounds down.
        assert_eq!(format_fixed(1.005, 2), "1.00");
        assert_eq!(format_fixed(150.0, 1), "150.0");
    }

    proptest! {
        #[test]
        fn mean_lies_between_extremes(values in prop::collection::vec(-1.0e6_f64..1.0e6_f64, 1..50)) {
            let (lo, hi) = min_max(&values).unwrap();
            let m = mean(&values);
            let tol = Tolerances { abs: 1e-6, rel: 1e-9 };
            prop_assert!(m >= lo || nearly_equal(m, lo, tol));
            prop_assert!(m <= hi || nearly_equal(m, hi, tol));
        }
    }
}
