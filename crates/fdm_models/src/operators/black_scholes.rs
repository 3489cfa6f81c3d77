//! Black-Scholes operator on a log-spot grid.

use crate::error::ModelError;
use crate::models::BlackScholesParams;
use fdm_core::market_data::YieldCurve;
use fdm_core::mesher::MesherComposite;
use fdm_core::operator::{LinearOpComposite, TripleBandLinearOp};

/// Generator of the Black-Scholes PDE in `x = ln S`:
///
/// ```text
/// A = 0.5 sigma^2 d2/dx2 + (r - q - 0.5 sigma^2) d/dx - r
/// ```
///
/// `set_time` re-derives `r` and `q` as forward rates of the supplied
/// curves over the current interval.
pub struct BlackScholesOp<R: YieldCurve, Q: YieldCurve> {
    size: usize,
    variance: f64,
    dx: TripleBandLinearOp,
    dxx_scaled: TripleBandLinearOp,
    map: TripleBandLinearOp,
    r_curve: R,
    q_curve: Q,
}

impl<R: YieldCurve, Q: YieldCurve> BlackScholesOp<R, Q> {
    /// Build the operator on a 1-D log-spot mesher.
    pub fn new(
        mesher: &MesherComposite,
        params: &BlackScholesParams,
        r_curve: R,
        q_curve: Q,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if mesher.dim() != 1 {
            return Err(ModelError::InvalidConfiguration(format!(
                "Black-Scholes operator needs a 1-D mesher, got {} dimensions",
                mesher.dim()
            )));
        }

        let variance = params.volatility * params.volatility;
        let dx = TripleBandLinearOp::first_derivative(0, mesher);
        let dxx_scaled =
            TripleBandLinearOp::second_derivative(0, mesher).scale(0.5 * variance);

        Ok(Self {
            size: mesher.size(),
            variance,
            map: TripleBandLinearOp::zero(0, mesher),
            dx,
            dxx_scaled,
            r_curve,
            q_curve,
        })
    }
}

impl<R: YieldCurve, Q: YieldCurve> LinearOpComposite for BlackScholesOp<R, Q> {
    fn size(&self) -> usize {
        self.size
    }

    fn ndim(&self) -> usize {
        1
    }

    fn set_time(&mut self, t1: f64, t2: f64) {
        let r = self.r_curve.forward_rate(t1, t2);
        let q = self.q_curve.forward_rate(t1, t2);
        self.map = self
            .dxx_scaled
            .add(&self.dx.scale(r - q - 0.5 * self.variance))
            .add_to_diagonal(-r);
    }

    fn apply(&self, r: &[f64]) -> Vec<f64> {
        self.map.apply(r)
    }

    fn apply_direction(&self, direction: usize, r: &[f64]) -> Vec<f64> {
        debug_assert_eq!(direction, 0);
        self.map.apply(r)
    }

    fn apply_mixed(&self, r: &[f64]) -> Vec<f64> {
        vec![0.0; r.len()]
    }

    fn solve_splitting(&self, direction: usize, r: &[f64], s: f64) -> Vec<f64> {
        debug_assert_eq!(direction, 0);
        self.map.solve_splitting(r, s, 1.0)
    }

    fn preconditioner(&self, r: &[f64], s: f64) -> Vec<f64> {
        self.solve_splitting(0, r, s)
    }
}
