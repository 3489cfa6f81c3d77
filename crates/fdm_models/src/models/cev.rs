//! Constant-elasticity-of-variance model parameters.

use crate::error::ModelError;

/// Driftless CEV dynamics of a forward: `dF = alpha F^beta dW`.
///
/// For `beta < 1` the origin is attainable and absorbing, which is why
/// the elasticity is restricted to the open unit interval here: the
/// finite-difference engine decides its lower boundary treatment from
/// [`absorbing_exponent`](Self::absorbing_exponent) once at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CevParams {
    /// Initial forward level.
    pub f0: f64,
    /// Volatility scale.
    pub alpha: f64,
    /// Elasticity exponent.
    pub beta: f64,
}

impl CevParams {
    /// Validated constructor.
    pub fn new(f0: f64, alpha: f64, beta: f64) -> Result<Self, ModelError> {
        let params = Self { f0, alpha, beta };
        params.validate()?;
        Ok(params)
    }

    /// Re-check the parameter domain.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.f0 > 0.0) || !self.f0.is_finite() {
            return Err(ModelError::parameter(
                "f0",
                self.f0,
                "must be positive and finite",
            ));
        }
        if !(self.alpha > 0.0) || !self.alpha.is_finite() {
            return Err(ModelError::parameter(
                "alpha",
                self.alpha,
                "must be positive and finite",
            ));
        }
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ModelError::parameter(
                "beta",
                self.beta,
                "must lie in the open interval (0, 1)",
            ));
        }
        Ok(())
    }

    /// The exponent `delta = (1 - 2 beta) / (1 - beta)` of the
    /// associated squared Bessel process. Below 2 the origin is
    /// attainable and the lower boundary degenerates to pure
    /// discounting.
    pub fn absorbing_exponent(&self) -> f64 {
        (1.0 - 2.0 * self.beta) / (1.0 - self.beta)
    }

    /// Lognormal-equivalent volatility at the initial forward,
    /// `alpha * f0^(beta - 1)`; the meshers size their truncation range
    /// from it.
    pub fn lognormal_volatility(&self) -> f64 {
        self.alpha * self.f0.powf(self.beta - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params() {
        assert!(CevParams::new(100.0, 0.2, 0.5).is_ok());
    }

    #[test]
    fn test_invalid_params() {
        assert!(CevParams::new(0.0, 0.2, 0.5).is_err());
        assert!(CevParams::new(100.0, -0.2, 0.5).is_err());
        assert!(CevParams::new(100.0, 0.2, 1.0).is_err());
        assert!(CevParams::new(100.0, 0.2, 0.0).is_err());
    }

    #[test]
    fn test_absorbing_exponent_below_two() {
        // for beta in (0, 1) the origin is always attainable
        for &beta in &[0.1, 0.3, 0.5, 0.7, 0.9] {
            let params = CevParams::new(100.0, 0.2, beta).unwrap();
            assert!(params.absorbing_exponent() < 2.0);
        }
    }

    #[test]
    fn test_lognormal_volatility() {
        let params = CevParams::new(100.0, 0.2, 0.5).unwrap();
        // 0.2 * 100^(-0.5) = 0.02
        assert!((params.lognormal_volatility() - 0.02).abs() < 1e-12);
    }
}
