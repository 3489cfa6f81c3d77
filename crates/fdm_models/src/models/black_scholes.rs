//! Black-Scholes model parameters.

use crate::error::ModelError;

/// Lognormal dynamics: `dS = (r - q) S dt + sigma S dW`.
///
/// Discounting and dividend curves are supplied separately to the
/// engine; the parameter set carries only the state and the volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlackScholesParams {
    /// Spot price.
    pub spot: f64,
    /// Lognormal volatility.
    pub volatility: f64,
}

impl BlackScholesParams {
    /// Validated constructor.
    pub fn new(spot: f64, volatility: f64) -> Result<Self, ModelError> {
        let params = Self { spot, volatility };
        params.validate()?;
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
        if !(self.volatility > 0.0) || !self.volatility.is_finite() {
            return Err(ModelError::parameter(
                "volatility",
                self.volatility,
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}
