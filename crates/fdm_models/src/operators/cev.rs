//! CEV operator on a forward grid.

use crate::error::ModelError;
use crate::models::CevParams;
use fdm_core::market_data::YieldCurve;
use fdm_core::mesher::MesherComposite;
use fdm_core::operator::{LinearOpComposite, TripleBandLinearOp};

/// Generator of the CEV PDE on the forward level `F`:
///
/// ```text
/// A = 0.5 alpha^2 F^(2 beta) d2/dF2 - r
/// ```
///
/// The forward is driftless; only the discounting rate is
/// time-dependent and re-derived by `set_time`.
pub struct CevOp<R: YieldCurve> {
    size: usize,
    base: TripleBandLinearOp,
    map: TripleBandLinearOp,
    r_curve: R,
}

impl<R: YieldCurve> CevOp<R> {
    /// Build the operator on a 1-D forward mesher.
    pub fn new(
        mesher: &MesherComposite,
        params: &CevParams,
        r_curve: R,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if mesher.dim() != 1 {
            return Err(ModelError::InvalidConfiguration(format!(
                "CEV operator needs a 1-D mesher, got {} dimensions",
                mesher.dim()
            )));
        }

        let diffusion: Vec<f64> = (0..mesher.size())
            .map(|i| {
                let f = mesher.location(i, 0);
                0.5 * params.alpha * params.alpha * f.powf(2.0 * params.beta)
            })
            .collect();
        let base = TripleBandLinearOp::second_derivative(0, mesher).mult(&diffusion);

        Ok(Self {
            size: mesher.size(),
            map: base.clone(),
            base,
            r_curve,
        })
    }
}

impl<R: YieldCurve> LinearOpComposite for CevOp<R> {
    fn size(&self) -> usize {
        self.size
    }

    fn ndim(&self) -> usize {
        1
    }

    fn set_time(&mut self, t1: f64, t2: f64) {
        let r = self.r_curve.forward_rate(t1, t2);
        self.map = self.base.clone().add_to_diagonal(-r);
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
