//! Heston operator on a log-spot x variance grid.

use crate::error::ModelError;
use crate::models::HestonParams;
use fdm_core::market_data::YieldCurve;
use fdm_core::mesher::MesherComposite;
use fdm_core::operator::{LinearOpComposite, NinePointLinearOp, TripleBandLinearOp};

/// Generator of the Heston PDE in `(x = ln S, v)`:
///
/// ```text
/// A = [0.5 v d2/dx2 + (r - q - 0.5 v) d/dx - r/2]      (direction 0)
///   + [0.5 sigma^2 v d2/dv2 + kappa (theta - v) d/dv - r/2]  (direction 1)
///   + rho sigma v d2/(dx dv)                            (mixed)
/// ```
///
/// Discounting is split evenly across the two directions so each
/// implicit solve carries half of it. The correlation term uses the
/// 9-point stencil and is only built when `rho != 0`.
pub struct HestonOp<R: YieldCurve, Q: YieldCurve> {
    size: usize,
    dx: TripleBandLinearOp,
    base_x: TripleBandLinearOp,
    base_v: TripleBandLinearOp,
    map_x: TripleBandLinearOp,
    map_v: TripleBandLinearOp,
    correlation: Option<NinePointLinearOp>,
    r_curve: R,
    q_curve: Q,
}

impl<R: YieldCurve, Q: YieldCurve> HestonOp<R, Q> {
    /// Build the operator on a 2-D (log-spot, variance) mesher.
    pub fn new(
        mesher: &MesherComposite,
        params: &HestonParams,
        r_curve: R,
        q_curve: Q,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if mesher.dim() != 2 {
            return Err(ModelError::InvalidConfiguration(format!(
                "Heston operator needs a 2-D mesher, got {} dimensions",
                mesher.dim()
            )));
        }

        let size = mesher.size();
        let v: Vec<f64> = (0..size).map(|i| mesher.location(i, 1)).collect();

        let dx = TripleBandLinearOp::first_derivative(0, mesher);
        let dxx = TripleBandLinearOp::second_derivative(0, mesher);
        let dv = TripleBandLinearOp::first_derivative(1, mesher);
        let dvv = TripleBandLinearOp::second_derivative(1, mesher);

        let half_v: Vec<f64> = v.iter().map(|vi| 0.5 * vi).collect();
        let minus_half_v: Vec<f64> = v.iter().map(|vi| -0.5 * vi).collect();
        let base_x = dxx.mult(&half_v).add(&dx.mult(&minus_half_v));

        let sigma2 = params.sigma * params.sigma;
        let half_sigma2_v: Vec<f64> = v.iter().map(|vi| 0.5 * sigma2 * vi).collect();
        let reversion: Vec<f64> = v
            .iter()
            .map(|vi| params.kappa * (params.theta - vi))
            .collect();
        let base_v = dvv.mult(&half_sigma2_v).add(&dv.mult(&reversion));

        let correlation = if params.rho != 0.0 {
            let coeff: Vec<f64> = v
                .iter()
                .map(|vi| params.rho * params.sigma * vi)
                .collect();
            Some(
                NinePointLinearOp::second_order_mixed_derivative(0, 1, mesher)
                    .mult(&coeff),
            )
        } else {
            None
        };

        Ok(Self {
            size,
            map_x: base_x.clone(),
            map_v: base_v.clone(),
            dx,
            base_x,
            base_v,
            correlation,
            r_curve,
            q_curve,
        })
    }
}

impl<R: YieldCurve, Q: YieldCurve> LinearOpComposite for HestonOp<R, Q> {
    fn size(&self) -> usize {
        self.size
    }

    fn ndim(&self) -> usize {
        2
    }

    fn set_time(&mut self, t1: f64, t2: f64) {
        let r = self.r_curve.forward_rate(t1, t2);
        let q = self.q_curve.forward_rate(t1, t2);
        self.map_x = self
            .base_x
            .add(&self.dx.scale(r - q))
            .add_to_diagonal(-0.5 * r);
        self.map_v = self.base_v.clone().add_to_diagonal(-0.5 * r);
    }

    fn apply(&self, r: &[f64]) -> Vec<f64> {
        let mut y = self.map_x.apply(r);
        let yv = self.map_v.apply(r);
        for (yi, vi) in y.iter_mut().zip(&yv) {
            *yi += vi;
        }
        if let Some(corr) = &self.correlation {
            let ym = corr.apply(r);
            for (yi, mi) in y.iter_mut().zip(&ym) {
                *yi += mi;
            }
        }
        y
    }

    fn apply_direction(&self, direction: usize, r: &[f64]) -> Vec<f64> {
        match direction {
            0 => self.map_x.apply(r),
            1 => self.map_v.apply(r),
            _ => unreachable!("Heston operator has two directions"),
        }
    }

    fn apply_mixed(&self, r: &[f64]) -> Vec<f64> {
        match &self.correlation {
            Some(corr) => corr.apply(r),
            None => vec![0.0; r.len()],
        }
    }

    fn solve_splitting(&self, direction: usize, r: &[f64], s: f64) -> Vec<f64> {
        match direction {
            0 => self.map_x.solve_splitting(r, s, 1.0),
            1 => self.map_v.solve_splitting(r, s, 1.0),
            _ => unreachable!("Heston operator has two directions"),
        }
    }

    fn preconditioner(&self, r: &[f64], s: f64) -> Vec<f64> {
        self.solve_splitting(0, r, s)
    }
}
