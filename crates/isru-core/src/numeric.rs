use crate::IsruError;

/// Floating point type used throughout system
pub type Real = f64;

/// Comparison tolerances for mass and energy balances.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
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

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, IsruError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(IsruError::NonFinite { what, value: v })
    }
}

/// `num / den`, or `fallback` when the denominator is zero or not finite.
///
/// Every ratio in the plant model whose denominator can legitimately reach
/// zero (required energy, capacity, target pressure) goes through here.
pub fn safe_ratio(num: Real, den: Real, fallback: Real) -> Real {
    if den == 0.0 || !den.is_finite() {
        fallback
    } else {
        num / den
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
pub fn unit_clamp(v: Real) -> Real {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// `n` evenly spaced samples over `[start, stop]`, both end points included.
///
/// A single sample yields `start`; zero samples yield an empty vector.
pub fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            (0..n).map(|i| start + step * i as Real).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
        assert!(format!("{err}").contains("Non-finite"));
    }

    #[test]
    fn safe_ratio_guards_zero() {
        assert_eq!(safe_ratio(3.0, 0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 2.0, 0.0), 1.5);
        assert_eq!(safe_ratio(3.0, Real::INFINITY, -1.0), -1.0);
    }

    #[test]
    fn unit_clamp_handles_nan() {
        assert_eq!(unit_clamp(Real::NAN), 0.0);
        assert_eq!(unit_clamp(1.7), 1.0);
        assert_eq!(unit_clamp(-0.2), 0.0);
    }

    #[test]
    fn linspace_includes_end_points() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
