//! One-dimensional backward solver with result interpolation.

use crate::error::FdmError;
use crate::math::NaturalCubicSpline;
use crate::operator::LinearOpComposite;
use crate::solver::{BackwardSolver, SchemeDesc, SolverDesc, THETA_SNAPSHOT_TIME};

/// Solves a 1-D pricing PDE backwards from maturity and answers value,
/// delta, gamma and theta queries at arbitrary coordinates.
///
/// All numerical work happens in [`new`](Self::new); queries only read
/// the retained surface. Delta and gamma come from the local cubic
/// polynomial of the spline, so the stencil is the same wherever the
/// query point falls, narrowing symmetrically at the grid edges.
pub struct Fdm1dSolver {
    x: Vec<f64>,
    result_values: Vec<f64>,
    interpolation: NaturalCubicSpline<f64>,
    snapshot: Option<(f64, NaturalCubicSpline<f64>)>,
}

impl Fdm1dSolver {
    /// Run the solve described by `desc` with `scheme` and the model
    /// operator `op`.
    pub fn new(
        mut desc: SolverDesc,
        scheme: SchemeDesc,
        mut op: Box<dyn LinearOpComposite>,
    ) -> Result<Self, FdmError> {
        desc.validate()?;
        if desc.mesher.dim() != 1 {
            return Err(FdmError::InvalidConfiguration(format!(
                "one-dimensional solver needs a 1-D mesher, got {} dimensions",
                desc.mesher.dim()
            )));
        }
        debug_assert_eq!(op.size(), desc.mesher.size());

        let x = desc.mesher.locations(0).to_vec();
        let mut rhs: Vec<f64> = (0..desc.mesher.size())
            .map(|i| desc.calculator.avg_inner_value(&desc.mesher, i, desc.maturity))
            .collect();

        if desc.maturity > THETA_SNAPSHOT_TIME {
            desc.conditions.add_snapshot(THETA_SNAPSHOT_TIME);
        }

        {
            let mut solver = BackwardSolver::new(
                op.as_mut(),
                &mut desc.boundaries,
                &mut desc.conditions,
                scheme,
            );
            solver.rollback(
                &mut rhs,
                desc.maturity,
                0.0,
                desc.time_steps,
                desc.damping_steps,
            )?;
        }

        let interpolation = NaturalCubicSpline::new(&x, &rhs)?;
        let snapshot = match (desc.conditions.snapshot_time(), desc.conditions.snapshot_values())
        {
            (Some(t), Some(values)) => Some((t, NaturalCubicSpline::new(&x, values)?)),
            _ => None,
        };

        Ok(Self {
            x,
            result_values: rhs,
            interpolation,
            snapshot,
        })
    }

    /// The solved surface at the evaluation time.
    pub fn result_values(&self) -> &[f64] {
        &self.result_values
    }

    /// The coordinate axis.
    pub fn locations(&self) -> &[f64] {
        &self.x
    }

    fn check_finite(value: f64, what: &str) -> Result<f64, FdmError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FdmError::NonFinite(format!("solved surface ({})", what)))
        }
    }

    /// Value at coordinate `x`.
    pub fn interpolate_at(&self, x: f64) -> Result<f64, FdmError> {
        Self::check_finite(self.interpolation.value(x)?, "value")
    }

    /// First derivative of the value with respect to the coordinate.
    pub fn derivative_x(&self, x: f64) -> Result<f64, FdmError> {
        Self::check_finite(self.interpolation.derivative(x)?, "delta")
    }

    /// Second derivative of the value with respect to the coordinate.
    pub fn derivative_xx(&self, x: f64) -> Result<f64, FdmError> {
        Self::check_finite(self.interpolation.second_derivative(x)?, "gamma")
    }

    /// Time derivative of the value, from the snapshot taken one small
    /// step away from the evaluation time.
    pub fn theta_at(&self, x: f64) -> Result<f64, FdmError> {
        let Some((t, spline)) = &self.snapshot else {
            return Err(FdmError::InvalidConfiguration(
                "maturity too short for a theta snapshot".to_string(),
            ));
        };
        let ahead = Self::check_finite(spline.value(x)?, "theta")?;
        let now = self.interpolate_at(x)?;
        Ok((ahead - now) / t)
    }
}

impl std::fmt::Debug for Fdm1dSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fdm1dSolver")
            .field("points", &self.x.len())
            .field("has_snapshot", &self.snapshot.is_some())
            .finish()
    }
}
