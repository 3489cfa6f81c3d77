//! Yield curve abstraction used by operators and boundary conditions.

use crate::error::FdmError;

/// Discount curve over year fractions.
///
/// The backward sweep only ever queries times inside `[0, maturity]`, so
/// the methods are total: negative times are treated as zero rather than
/// reported as errors. Validation of curve data happens at construction.
///
/// # Invariants
///
/// - `discount(0) = 1`
/// - `discount(t) > 0` for all `t >= 0`
pub trait YieldCurve {
    /// Discount factor `D(t)` for maturity `t` (continuously
    /// compounded). Times below zero are clamped to zero.
    fn discount(&self, t: f64) -> f64;

    /// Continuously compounded forward rate over `[t1, t2]`.
    ///
    /// A degenerate interval is widened to a short window so the
    /// instantaneous rate comes back instead of 0/0.
    fn forward_rate(&self, t1: f64, t2: f64) -> f64 {
        const MIN_DT: f64 = 1e-8;
        let t1 = t1.max(0.0);
        let t2 = t2.max(t1 + MIN_DT);
        -(self.discount(t2) / self.discount(t1)).ln() / (t2 - t1)
    }
}

/// Flat curve with a single continuously compounded rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatCurve {
    rate: f64,
}

impl FlatCurve {
    /// Construct a flat curve. Negative rates are allowed.
    #[inline]
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// The constant rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl YieldCurve for FlatCurve {
    fn discount(&self, t: f64) -> f64 {
        (-self.rate * t.max(0.0)).exp()
    }

    fn forward_rate(&self, _t1: f64, _t2: f64) -> f64 {
        self.rate
    }
}

/// Piecewise-linear zero curve with flat extrapolation beyond the ends.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolatedZeroCurve {
    times: Vec<f64>,
    zero_rates: Vec<f64>,
}

impl InterpolatedZeroCurve {
    /// Construct from pillar times (non-negative, strictly increasing)
    /// and zero rates.
    pub fn new(times: Vec<f64>, zero_rates: Vec<f64>) -> Result<Self, FdmError> {
        if times.len() != zero_rates.len() {
            return Err(FdmError::InvalidConfiguration(format!(
                "curve pillars and rates must have same length: got {} and {}",
                times.len(),
                zero_rates.len()
            )));
        }
        if times.len() < 2 {
            return Err(FdmError::InvalidConfiguration(
                "interpolated curve needs at least 2 pillars".to_string(),
            ));
        }
        if times[0] < 0.0 {
            return Err(FdmError::InvalidConfiguration(
                "curve pillar times must be non-negative".to_string(),
            ));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FdmError::InvalidConfiguration(
                "curve pillar times must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { times, zero_rates })
    }

    /// Linearly interpolated zero rate at `t`, flat outside the pillars.
    pub fn zero_rate(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        if t <= self.times[0] {
            return self.zero_rates[0];
        }
        let last = self.times.len() - 1;
        if t >= self.times[last] {
            return self.zero_rates[last];
        }
        let i = self.times.partition_point(|&ti| ti <= t) - 1;
        let w = (t - self.times[i]) / (self.times[i + 1] - self.times[i]);
        self.zero_rates[i] + w * (self.zero_rates[i + 1] - self.zero_rates[i])
    }
}

impl YieldCurve for InterpolatedZeroCurve {
    fn discount(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        (-self.zero_rate(t) * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_curve_discount() {
        let curve = FlatCurve::new(0.05);
        assert!((curve.discount(1.0) - 0.951_229_424_5).abs() < 1e-9);
        assert_eq!(curve.discount(0.0), 1.0);
    }

    #[test]
    fn test_flat_curve_forward_rate() {
        let curve = FlatCurve::new(0.05);
        assert!((curve.forward_rate(0.25, 0.75) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_flat_curve_negative_time_clamped() {
        let curve = FlatCurve::new(0.05);
        assert_eq!(curve.discount(-1.0), 1.0);
    }

    #[test]
    fn test_default_forward_rate_recovers_flat() {
        // Exercise the trait's default implementation through a curve
        // that does not override it.
        let curve =
            InterpolatedZeroCurve::new(vec![0.0, 10.0], vec![0.03, 0.03]).unwrap();
        assert!((curve.forward_rate(1.0, 2.0) - 0.03).abs() < 1e-10);
    }

    #[test]
    fn test_interpolated_curve_validation() {
        assert!(InterpolatedZeroCurve::new(vec![0.0], vec![0.05]).is_err());
        assert!(InterpolatedZeroCurve::new(vec![0.0, 0.0], vec![0.05, 0.05]).is_err());
        assert!(InterpolatedZeroCurve::new(vec![-1.0, 1.0], vec![0.05, 0.05]).is_err());
        assert!(
            InterpolatedZeroCurve::new(vec![0.0, 1.0], vec![0.05]).is_err(),
            "length mismatch must be rejected"
        );
    }

    #[test]
    fn test_interpolated_zero_rate() {
        let curve =
            InterpolatedZeroCurve::new(vec![0.0, 1.0, 2.0], vec![0.02, 0.04, 0.04]).unwrap();
        assert!((curve.zero_rate(0.5) - 0.03).abs() < 1e-12);
        // flat extrapolation
        assert!((curve.zero_rate(5.0) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_forward_rate_degenerate_interval() {
        let curve = FlatCurve::new(0.02);
        let f = curve.forward_rate(1.0, 1.0);
        assert!(f.is_finite());
        assert!((f - 0.02).abs() < 1e-9);
    }
}
