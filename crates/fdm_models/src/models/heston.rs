//! Heston stochastic-volatility model parameters.

use crate::error::ModelError;
use tracing::warn;

/// Heston dynamics:
///
/// ```text
/// dS = (r - q) S dt + sqrt(v) S dW_S
/// dv = kappa (theta - v) dt + sigma sqrt(v) dW_v
/// E[dW_S dW_v] = rho dt
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Spot price.
    pub spot: f64,
    /// Initial variance.
    pub v0: f64,
    /// Long-run variance.
    pub theta: f64,
    /// Mean-reversion speed.
    pub kappa: f64,
    /// Volatility of variance.
    pub sigma: f64,
    /// Spot-variance correlation.
    pub rho: f64,
}

impl HestonParams {
    /// Validated constructor.
    ///
    /// A Feller-condition violation is not an error — the variance grid
    /// simply carries mass near the origin — but it is logged, since it
    /// degrades the accuracy of coarse variance grids.
    pub fn new(
        spot: f64,
        v0: f64,
        theta: f64,
        kappa: f64,
        sigma: f64,
        rho: f64,
    ) -> Result<Self, ModelError> {
        let params = Self {
            spot,
            v0,
            theta,
            kappa,
            sigma,
            rho,
        };
        params.validate()?;
        if !params.satisfies_feller() {
            warn!(
                kappa,
                theta, sigma, "Feller condition 2*kappa*theta > sigma^2 violated"
            );
        }
        Ok(params)
    }

    /// Re-check the parameter domain.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.spot > 0.0) || !self.spot.is_finite() {
            return Err(ModelError::parameter(
                "spot",
                self.spot,
                "must be positive and finite",
            ));
        }
        if !(self.v0 > 0.0) || !self.v0.is_finite() {
            return Err(ModelError::parameter(
                "v0",
                self.v0,
                "must be positive and finite",
            ));
        }
        if !(self.theta > 0.0) || !self.theta.is_finite() {
            return Err(ModelError::parameter(
                "theta",
                self.theta,
                "must be positive and finite",
            ));
        }
        if !(self.kappa > 0.0) || !self.kappa.is_finite() {
            return Err(ModelError::parameter(
                "kappa",
                self.kappa,
                "must be positive and finite",
            ));
        }
        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(ModelError::parameter(
                "sigma",
                self.sigma,
                "must be positive and finite",
            ));
        }
        if !(self.rho >= -1.0 && self.rho <= 1.0) {
            return Err(ModelError::parameter(
                "rho",
                self.rho,
                "must lie in [-1, 1]",
            ));
        }
        Ok(())
    }

    /// Feller condition `2 kappa theta > sigma^2`.
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.sigma * self.sigma
    }

    /// Average expected variance over `[0, maturity]`:
    /// `theta + (v0 - theta) (1 - exp(-kappa T)) / (kappa T)`.
    ///
    /// The square root of this feeds the equity mesher's truncation
    /// range.
    pub fn average_variance(&self, maturity: f64) -> f64 {
        let kt = self.kappa * maturity;
        self.theta + (self.v0 - self.theta) * (1.0 - (-kt).exp()) / kt
    }
}
