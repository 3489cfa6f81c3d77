//! Forward-space mesher for CEV dynamics.

use crate::error::ModelError;
use fdm_core::math::inverse_norm_cdf;
use fdm_core::mesher::Mesher1d;

/// Builds a forward-space grid for driftless CEV dynamics.
///
/// The upper truncation bound comes from the lognormal-equivalent
/// volatility `alpha * f0^(beta - 1)` at the `eps` tail quantile,
/// widened by `scale_factor`. The lower bound is pinned at the origin:
/// for `beta < 1` the origin is attainable and absorbing, so the grid
/// must include it. Points concentrate around
/// `strike_concentration.0` with density `strike_concentration.1`.
#[allow(clippy::too_many_arguments)]
pub fn cev_mesher(
    size: usize,
    f0: f64,
    alpha: f64,
    beta: f64,
    maturity: f64,
    eps: f64,
    scale_factor: f64,
    strike_concentration: (f64, f64),
) -> Result<Mesher1d, ModelError> {
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

    let (strike, density) = strike_concentration;
    let sigma_ln = alpha * f0.powf(beta - 1.0);
    let width = scale_factor * sigma_ln * maturity.sqrt() * inverse_norm_cdf(1.0 - eps);
    let upper = (f0 * (-0.5 * sigma_ln * sigma_ln * maturity + width).exp())
        .max(1.25 * strike)
        .max(1.25 * f0);

    Mesher1d::concentrating(0.0, upper, size, (strike, density))
        .map_err(|e| ModelError::InvalidConfiguration(e.to_string()))
}
