//! Two-dimensional backward solver with result interpolation.

use crate::error::FdmError;
use crate::math::NaturalCubicSpline;
use crate::operator::LinearOpComposite;
use crate::solver::{BackwardSolver, SchemeDesc, SolverDesc, THETA_SNAPSHOT_TIME};

/// Solves a 2-D pricing PDE backwards from maturity and answers value,
/// delta, gamma and theta queries at arbitrary `(x, y)` coordinates.
///
/// Queries run a two-pass spline tensor: one natural cubic spline per
/// `y`-line evaluated at `x`, then a spline across those results
/// evaluated at `y`. Derivative queries differentiate the `x`-splines
/// and interpolate the results the same way, so the stencil is uniform
/// away from the edges and narrows symmetrically at them.
pub struct Fdm2dSolver {
    x: Vec<f64>,
    y: Vec<f64>,
    result_values: Vec<f64>,
    snapshot: Option<(f64, Vec<f64>)>,
}

impl Fdm2dSolver {
    /// Run the solve described by `desc` with `scheme` and the model
    /// operator `op`.
    pub fn new(
        mut desc: SolverDesc,
        scheme: SchemeDesc,
        mut op: Box<dyn LinearOpComposite>,
    ) -> Result<Self, FdmError> {
        desc.validate()?;
        if desc.mesher.dim() != 2 {
            return Err(FdmError::InvalidConfiguration(format!(
                "two-dimensional solver needs a 2-D mesher, got {} dimensions",
                desc.mesher.dim()
            )));
        }
        debug_assert_eq!(op.size(), desc.mesher.size());

        let x = desc.mesher.locations(0).to_vec();
        let y = desc.mesher.locations(1).to_vec();
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

        let snapshot = match (desc.conditions.snapshot_time(), desc.conditions.snapshot_values())
        {
            (Some(t), Some(values)) => Some((t, values.to_vec())),
            _ => None,
        };

        Ok(Self {
            x,
            y,
            result_values: rhs,
            snapshot,
        })
    }

    /// The solved surface at the evaluation time (dimension 0 fastest).
    pub fn result_values(&self) -> &[f64] {
        &self.result_values
    }

    /// The first coordinate axis.
    pub fn x_locations(&self) -> &[f64] {
        &self.x
    }

    /// The second coordinate axis.
    pub fn y_locations(&self) -> &[f64] {
        &self.y
    }

    fn check_finite(value: f64, what: &str) -> Result<f64, FdmError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FdmError::NonFinite(format!("solved surface ({})", what)))
        }
    }

    /// Two-pass tensor interpolation of a stored surface; `mode` picks
    /// value or an x-derivative of the inner splines.
    fn query(
        &self,
        values: &[f64],
        x: f64,
        y: f64,
        mode: QueryMode,
    ) -> Result<f64, FdmError> {
        let n0 = self.x.len();
        let n1 = self.y.len();
        debug_assert_eq!(values.len(), n0 * n1);

        let mut by_line = Vec::with_capacity(n1);
        for j in 0..n1 {
            let row = &values[j * n0..(j + 1) * n0];
            let spline = NaturalCubicSpline::new(&self.x, row)?;
            let v = match mode {
                QueryMode::Value => spline.value(x)?,
                QueryMode::DerivativeX => spline.derivative(x)?,
                QueryMode::DerivativeXx => spline.second_derivative(x)?,
            };
            by_line.push(v);
        }
        let across = NaturalCubicSpline::new(&self.y, &by_line)?;
        Ok(across.value(y)?)
    }

    /// Value at `(x, y)`.
    pub fn interpolate_at(&self, x: f64, y: f64) -> Result<f64, FdmError> {
        Self::check_finite(
            self.query(&self.result_values, x, y, QueryMode::Value)?,
            "value",
        )
    }

    /// First derivative with respect to the first coordinate.
    pub fn derivative_x(&self, x: f64, y: f64) -> Result<f64, FdmError> {
        Self::check_finite(
            self.query(&self.result_values, x, y, QueryMode::DerivativeX)?,
            "delta",
        )
    }

    /// Second derivative with respect to the first coordinate.
    pub fn derivative_xx(&self, x: f64, y: f64) -> Result<f64, FdmError> {
        Self::check_finite(
            self.query(&self.result_values, x, y, QueryMode::DerivativeXx)?,
            "gamma",
        )
    }

    /// Time derivative of the value, from the snapshot taken one small
    /// step away from the evaluation time.
    pub fn theta_at(&self, x: f64, y: f64) -> Result<f64, FdmError> {
        let Some((t, values)) = &self.snapshot else {
            return Err(FdmError::InvalidConfiguration(
                "maturity too short for a theta snapshot".to_string(),
            ));
        };
        let ahead = Self::check_finite(self.query(values, x, y, QueryMode::Value)?, "theta")?;
        let now = self.interpolate_at(x, y)?;
        Ok((ahead - now) / t)
    }
}

#[derive(Clone, Copy)]
enum QueryMode {
    Value,
    DerivativeX,
    DerivativeXx,
}

impl std::fmt::Debug for Fdm2dSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fdm2dSolver")
            .field("dims", &(self.x.len(), self.y.len()))
            .field("has_snapshot", &self.snapshot.is_some())
            .finish()
    }
}
