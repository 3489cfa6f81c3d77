//! SABR operator on a forward x log-volatility grid.

use crate::error::ModelError;
use crate::models::SabrParams;
use fdm_core::market_data::YieldCurve;
use fdm_core::mesher::MesherComposite;
use fdm_core::operator::{LinearOpComposite, NinePointLinearOp, TripleBandLinearOp};

/// Generator of the SABR PDE in `(F, x = ln a)`:
///
/// ```text
/// A = [0.5 e^(2x) F^(2 beta) d2/dF2 - r/2]          (direction 0)
///   + [0.5 nu^2 d2/dx2 - 0.5 nu^2 d/dx - r/2]       (direction 1)
///   + rho nu e^x F^beta d2/(dF dx)                  (mixed)
/// ```
///
/// Only the discounting rate is time-dependent.
pub struct SabrOp<R: YieldCurve> {
    size: usize,
    base_f: TripleBandLinearOp,
    base_x: TripleBandLinearOp,
    map_f: TripleBandLinearOp,
    map_x: TripleBandLinearOp,
    correlation: NinePointLinearOp,
    r_curve: R,
}

impl<R: YieldCurve> SabrOp<R> {
    /// Build the operator on a 2-D (forward, log-volatility) mesher.
    pub fn new(
        mesher: &MesherComposite,
        params: &SabrParams,
        r_curve: R,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if mesher.dim() != 2 {
            return Err(ModelError::InvalidConfiguration(format!(
                "SABR operator needs a 2-D mesher, got {} dimensions",
                mesher.dim()
            )));
        }

        let size = mesher.size();
        let diffusion_f: Vec<f64> = (0..size)
            .map(|i| {
                let f = mesher.location(i, 0);
                let x = mesher.location(i, 1);
                0.5 * (2.0 * x).exp() * f.powf(2.0 * params.beta)
            })
            .collect();
        let base_f =
            TripleBandLinearOp::second_derivative(0, mesher).mult(&diffusion_f);

        let nu2 = params.nu * params.nu;
        let base_x = TripleBandLinearOp::second_derivative(1, mesher)
            .scale(0.5 * nu2)
            .add(&TripleBandLinearOp::first_derivative(1, mesher).scale(-0.5 * nu2));

        let corr_coeff: Vec<f64> = (0..size)
            .map(|i| {
                let f = mesher.location(i, 0);
                let x = mesher.location(i, 1);
                params.rho * params.nu * x.exp() * f.powf(params.beta)
            })
            .collect();
        let correlation = NinePointLinearOp::second_order_mixed_derivative(0, 1, mesher)
            .mult(&corr_coeff);

        Ok(Self {
            size,
            map_f: base_f.clone(),
            map_x: base_x.clone(),
            base_f,
            base_x,
            correlation,
            r_curve,
        })
    }
}

impl<R: YieldCurve> LinearOpComposite for SabrOp<R> {
    fn size(&self) -> usize {
        self.size
    }

    fn ndim(&self) -> usize {
        2
    }

    fn set_time(&mut self, t1: f64, t2: f64) {
        let r = self.r_curve.forward_rate(t1, t2);
        self.map_f = self.base_f.clone().add_to_diagonal(-0.5 * r);
        self.map_x = self.base_x.clone().add_to_diagonal(-0.5 * r);
    }

    fn apply(&self, r: &[f64]) -> Vec<f64> {
        let mut y = self.map_f.apply(r);
        let yx = self.map_x.apply(r);
        let ym = self.correlation.apply(r);
        for i in 0..y.len() {
            y[i] += yx[i] + ym[i];
        }
        y
    }

    fn apply_direction(&self, direction: usize, r: &[f64]) -> Vec<f64> {
        match direction {
            0 => self.map_f.apply(r),
            1 => self.map_x.apply(r),
            _ => unreachable!("SABR operator has two directions"),
        }
    }

    fn apply_mixed(&self, r: &[f64]) -> Vec<f64> {
        self.correlation.apply(r)
    }

    fn solve_splitting(&self, direction: usize, r: &[f64], s: f64) -> Vec<f64> {
        match direction {
            0 => self.map_f.solve_splitting(r, s, 1.0),
            1 => self.map_x.solve_splitting(r, s, 1.0),
            _ => unreachable!("SABR operator has two directions"),
        }
    }

    fn preconditioner(&self, r: &[f64], s: f64) -> Vec<f64> {
        self.solve_splitting(0, r, s)
    }
}
