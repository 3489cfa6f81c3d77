//! Dirichlet-type boundary conditions.

use super::{boundary_indices, BoundaryCondition, BoundarySide};
use crate::market_data::YieldCurve;
use crate::mesher::MesherComposite;

/// Constant-value Dirichlet condition on one boundary layer.
#[derive(Debug, Clone)]
pub struct DirichletBoundary {
    indices: Vec<usize>,
    value: f64,
}

impl DirichletBoundary {
    /// Pin the `(direction, side)` layer of the grid to `value`.
    pub fn new(
        mesher: &MesherComposite,
        value: f64,
        direction: usize,
        side: BoundarySide,
    ) -> Self {
        Self {
            indices: boundary_indices(mesher.layout(), direction, side),
            value,
        }
    }
}

impl BoundaryCondition for DirichletBoundary {
    fn apply_after_applying(&self, a: &mut [f64]) {
        for &i in &self.indices {
            a[i] = self.value;
        }
    }

    fn apply_after_solving(&self, a: &mut [f64]) {
        for &i in &self.indices {
            a[i] = self.value;
        }
    }
}

/// Dirichlet condition whose value is an externally supplied function of
/// time, evaluated at the current time of the backward sweep.
///
/// The function is typically an auxiliary closed-form pricer evaluated
/// at the boundary coordinate; the core treats it as an opaque
/// collaborator.
pub struct TimeDepDirichletBoundary {
    indices: Vec<usize>,
    value_on_boundary: Box<dyn Fn(f64) -> f64>,
    current: f64,
}

impl TimeDepDirichletBoundary {
    /// Pin the `(direction, side)` layer to `value_on_boundary(t)`.
    pub fn new(
        mesher: &MesherComposite,
        value_on_boundary: Box<dyn Fn(f64) -> f64>,
        direction: usize,
        side: BoundarySide,
    ) -> Self {
        Self {
            indices: boundary_indices(mesher.layout(), direction, side),
            value_on_boundary,
            current: 0.0,
        }
    }

    /// Boundary value equal to a fixed terminal cash flow discounted
    /// from `maturity` back to the current time through `curve`.
    ///
    /// Models the region where the PDE degenerates to pure discounting
    /// (an absorbing boundary).
    pub fn discounted_cash_flow<C: YieldCurve + 'static>(
        mesher: &MesherComposite,
        curve: C,
        maturity: f64,
        cash_flow: f64,
        direction: usize,
        side: BoundarySide,
    ) -> Self {
        let f = move |t: f64| cash_flow * curve.discount(maturity) / curve.discount(t);
        Self::new(mesher, Box::new(f), direction, side)
    }
}

impl BoundaryCondition for TimeDepDirichletBoundary {
    fn set_time(&mut self, t: f64) {
        self.current = (self.value_on_boundary)(t);
    }

    fn apply_after_applying(&self, a: &mut [f64]) {
        for &i in &self.indices {
            a[i] = self.current;
        }
    }

    fn apply_after_solving(&self, a: &mut [f64]) {
        for &i in &self.indices {
            a[i] = self.current;
        }
    }
}

impl std::fmt::Debug for TimeDepDirichletBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeDepDirichletBoundary")
            .field("points", &self.indices.len())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::FlatCurve;
    use crate::mesher::Mesher1d;

    fn mesher_1d() -> MesherComposite {
        MesherComposite::from_single(Mesher1d::uniform(0.0, 1.0, 5).unwrap()).unwrap()
    }

    #[test]
    fn test_dirichlet_overwrites_boundary_only() {
        let mesher = mesher_1d();
        let bc = DirichletBoundary::new(&mesher, 7.0, 0, BoundarySide::Upper);
        let mut a = vec![1.0; 5];
        bc.apply_after_applying(&mut a);
        assert_eq!(a, vec![1.0, 1.0, 1.0, 1.0, 7.0]);
    }

    #[test]
    fn test_time_dep_dirichlet_tracks_time() {
        let mesher = mesher_1d();
        let mut bc = TimeDepDirichletBoundary::new(
            &mesher,
            Box::new(|t| 100.0 * t),
            0,
            BoundarySide::Lower,
        );
        let mut a = vec![0.0; 5];

        bc.set_time(0.5);
        bc.apply_after_solving(&mut a);
        assert_eq!(a[0], 50.0);

        bc.set_time(0.25);
        bc.apply_after_solving(&mut a);
        assert_eq!(a[0], 25.0);
    }

    #[test]
    fn test_discounted_cash_flow_boundary() {
        let mesher = mesher_1d();
        let rate = 0.05;
        let maturity = 2.0;
        let cash_flow = 10.0;
        let mut bc = TimeDepDirichletBoundary::discounted_cash_flow(
            &mesher,
            FlatCurve::new(rate),
            maturity,
            cash_flow,
            0,
            BoundarySide::Upper,
        );

        // at maturity the cash flow is undiscounted
        bc.set_time(maturity);
        let mut a = vec![0.0; 5];
        bc.apply_after_applying(&mut a);
        assert!((a[4] - cash_flow).abs() < 1e-12);

        // at t=0 it is discounted over the full horizon
        bc.set_time(0.0);
        bc.apply_after_applying(&mut a);
        assert!((a[4] - cash_flow * (-rate * maturity).exp()).abs() < 1e-12);
    }
}
