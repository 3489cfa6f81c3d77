//! Variance-axis mesher for Heston dynamics.

use crate::error::ModelError;
use crate::models::HestonParams;
use fdm_core::mesher::Mesher1d;

/// Lower edge of the variance grid. Strictly positive so the
/// square-root diffusion coefficient never vanishes on the whole grid
/// line, while still close enough to the origin to capture the
/// degenerate-boundary behaviour.
const V_MIN: f64 = 1e-4;

/// Truncation multiple of the variance anchor.
const V_MAX_SCALE: f64 = 5.0;

/// Concentration density around the initial variance.
const V0_DENSITY: f64 = 0.1;

/// A variance grid plus the average-volatility estimate the equity
/// mesher sizes its own range from.
#[derive(Debug, Clone)]
pub struct VarianceMesher {
    /// The variance axis.
    pub mesher: Mesher1d,
    /// Square root of the expected average variance over the horizon.
    pub vol_estimate: f64,
}

/// Builds the variance axis for a Heston solve.
///
/// The range is `[V_MIN, 5 * max(v0, theta)]` with points concentrated
/// around `v0`; the accompanying volatility estimate is the square root
/// of the time-averaged expected variance.
pub fn heston_variance_mesher(
    size: usize,
    params: &HestonParams,
    maturity: f64,
) -> Result<VarianceMesher, ModelError> {
    if !(maturity > 0.0) || !maturity.is_finite() {
        return Err(ModelError::parameter(
            "maturity",
            maturity,
            "must be positive and finite",
        ));
    }

    let anchor = params.v0.max(params.theta);
    let v_max = V_MAX_SCALE * anchor;
    let point = params.v0.clamp(V_MIN, v_max);

    let mesher = Mesher1d::concentrating(V_MIN, v_max, size, (point, V0_DENSITY))
        .map_err(|e| ModelError::InvalidConfiguration(e.to_string()))?;

    let vol_estimate = params.average_variance(maturity).max(V_MIN).sqrt();

    Ok(VarianceMesher {
        mesher,
        vol_estimate,
    })
}
