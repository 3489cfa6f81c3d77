//! SABR model parameters.

use crate::error::ModelError;

/// SABR dynamics of a forward and its stochastic volatility:
///
/// ```text
/// dF = a F^beta dW_F,   a(0) = alpha
/// da = nu a dW_a
/// E[dW_F dW_a] = rho dt
/// ```
///
/// The grid works in `(F, x = ln a)`, so `nu` must be strictly positive
/// and `beta` strictly below one (the CEV forward grid needs the
/// attainable-origin regime).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrParams {
    /// Initial forward level.
    pub f0: f64,
    /// Initial volatility level.
    pub alpha: f64,
    /// Elasticity exponent.
    pub beta: f64,
    /// Volatility of volatility.
    pub nu: f64,
    /// Forward-volatility correlation.
    pub rho: f64,
}

impl SabrParams {
    /// Validated constructor.
    pub fn new(f0: f64, alpha: f64, beta: f64, nu: f64, rho: f64) -> Result<Self, ModelError> {
        let params = Self {
            f0,
            alpha,
            beta,
            nu,
            rho,
        };
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
        if !(self.nu > 0.0) || !self.nu.is_finite() {
            return Err(ModelError::parameter(
                "nu",
                self.nu,
                "must be positive and finite",
            ));
        }
        if !(self.rho > -1.0 && self.rho < 1.0) {
            return Err(ModelError::parameter(
                "rho",
                self.rho,
                "must lie in the open interval (-1, 1)",
            ));
        }
        Ok(())
    }
}
