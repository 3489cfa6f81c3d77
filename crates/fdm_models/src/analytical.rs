//! Closed-form Black-Scholes reference.
//!
//! The finite-difference engines are validated against this in the test
//! suites; it also serves as an injectable boundary-value provider for
//! time-dependent Dirichlet conditions.

use crate::error::ModelError;
use crate::payoff::OptionType;
use fdm_core::math::{norm_cdf, norm_pdf};

/// Black-Scholes closed form with flat rate, dividend yield and
/// volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    dividend_yield: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Validated constructor.
    pub fn new(
        spot: f64,
        rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Result<Self, ModelError> {
        if !(spot > 0.0) || !spot.is_finite() {
            return Err(ModelError::InvalidParameter {
                name: "spot",
                value: spot,
                constraint: "must be positive and finite",
            });
        }
        if !(volatility > 0.0) || !volatility.is_finite() {
            return Err(ModelError::InvalidParameter {
                name: "volatility",
                value: volatility,
                constraint: "must be positive and finite",
            });
        }
        Ok(Self {
            spot,
            rate,
            dividend_yield,
            volatility,
        })
    }

    fn d1_d2(&self, strike: f64, expiry: f64) -> (f64, f64) {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let d1 = ((self.spot / strike).ln()
            + (self.rate - self.dividend_yield + 0.5 * self.volatility * self.volatility)
                * expiry)
            / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }

    /// Option price.
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        if expiry <= 0.0 {
            return match option_type {
                OptionType::Call => (self.spot - strike).max(0.0),
                OptionType::Put => (strike - self.spot).max(0.0),
            };
        }
        let (d1, d2) = self.d1_d2(strike, expiry);
        let df_r = (-self.rate * expiry).exp();
        let df_q = (-self.dividend_yield * expiry).exp();
        match option_type {
            OptionType::Call => {
                self.spot * df_q * norm_cdf(d1) - strike * df_r * norm_cdf(d2)
            }
            OptionType::Put => {
                strike * df_r * norm_cdf(-d2) - self.spot * df_q * norm_cdf(-d1)
            }
        }
    }

    /// Spot delta.
    pub fn delta(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        let (d1, _) = self.d1_d2(strike, expiry);
        let df_q = (-self.dividend_yield * expiry).exp();
        match option_type {
            OptionType::Call => df_q * norm_cdf(d1),
            OptionType::Put => df_q * (norm_cdf(d1) - 1.0),
        }
    }

    /// Spot gamma (identical for calls and puts).
    pub fn gamma(&self, strike: f64, expiry: f64) -> f64 {
        let (d1, _) = self.d1_d2(strike, expiry);
        let df_q = (-self.dividend_yield * expiry).exp();
        df_q * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Calendar-time theta.
    pub fn theta(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        let (d1, d2) = self.d1_d2(strike, expiry);
        let df_r = (-self.rate * expiry).exp();
        let df_q = (-self.dividend_yield * expiry).exp();
        let common =
            -self.spot * df_q * norm_pdf(d1) * self.volatility / (2.0 * expiry.sqrt());
        match option_type {
            OptionType::Call => {
                common + self.dividend_yield * self.spot * df_q * norm_cdf(d1)
                    - self.rate * strike * df_r * norm_cdf(d2)
            }
            OptionType::Put => {
                common - self.dividend_yield * self.spot * df_q * norm_cdf(-d1)
                    + self.rate * strike * df_r * norm_cdf(-d2)
            }
        }
    }
}
