//! Log-spot mesher for lognormal dynamics.

use crate::error::ModelError;
use fdm_core::market_data::YieldCurve;
use fdm_core::math::inverse_norm_cdf;
use fdm_core::mesher::Mesher1d;

/// Concentration density around the strike, as a fraction of the grid
/// width.
const STRIKE_DENSITY: f64 = 0.1;

/// Builds a log-spot grid for Black-Scholes-type dynamics.
///
/// The range covers the terminal log-price distribution out to the
/// `eps` tail quantile, widened by `scale_factor`, centred on the
/// median of the terminal distribution; points concentrate around the
/// log strike. Discrete cash dividends shrink the anchor forward, so
/// the grid still covers the post-dividend region.
#[allow(clippy::too_many_arguments)]
pub fn black_scholes_mesher<R, Q>(
    size: usize,
    spot: f64,
    volatility: f64,
    maturity: f64,
    strike: f64,
    r_curve: &R,
    q_curve: &Q,
    eps: f64,
    scale_factor: f64,
    dividends: &[(f64, f64)],
) -> Result<Mesher1d, ModelError>
where
    R: YieldCurve,
    Q: YieldCurve,
{
    if !(maturity > 0.0) || !maturity.is_finite() {
        return Err(ModelError::parameter(
            "maturity",
            maturity,
            "must be positive and finite",
        ));
    }
    if !(eps > 0.0 && eps < 0.5) {
        return Err(ModelError::parameter("eps", eps, "must lie in (0, 0.5)"));
    }
    if !(scale_factor > 0.0) || !scale_factor.is_finite() {
        return Err(ModelError::parameter(
            "scale_factor",
            scale_factor,
            "must be positive and finite",
        ));
    }
    if !(strike > 0.0) {
        return Err(ModelError::parameter(
            "strike",
            strike,
            "must be positive",
        ));
    }

    // escrow the dividends out of the anchor spot
    let dividend_pv: f64 = dividends
        .iter()
        .filter(|(t, _)| *t > 0.0 && *t <= maturity)
        .map(|(t, amount)| amount * r_curve.discount(*t))
        .sum();
    let spot_adj = spot - dividend_pv;
    if !(spot_adj > 0.0) {
        return Err(ModelError::InvalidConfiguration(format!(
            "present value of dividends ({}) exhausts the spot ({})",
            dividend_pv, spot
        )));
    }

    let forward = spot_adj * q_curve.discount(maturity) / r_curve.discount(maturity);
    let center = forward.ln() - 0.5 * volatility * volatility * maturity;
    let width = scale_factor * volatility * maturity.sqrt() * inverse_norm_cdf(1.0 - eps);

    let k = strike.ln();
    let x_min = (center - width).min(k - 0.05);
    let x_max = (center + width).max(k + 0.05);

    Mesher1d::concentrating(x_min, x_max, size, (k, STRIKE_DENSITY))
        .map_err(|e| ModelError::InvalidConfiguration(e.to_string()))
}
