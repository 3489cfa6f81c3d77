//! Backward time-marching solvers.
//!
//! [`SolverDesc`] bundles everything one solve needs; the
//! [`BackwardSolver`] rolls a grid from maturity to the evaluation time
//! with the configured operator-splitting scheme; [`Fdm1dSolver`] and
//! [`Fdm2dSolver`] add terminal-condition setup and result
//! interpolation on top.

mod scheme;
mod solver1d;
mod solver2d;
mod steppers;

pub use scheme::{SchemeDesc, SchemeKind};
pub use solver1d::Fdm1dSolver;
pub use solver2d::Fdm2dSolver;
pub use steppers::BackwardSolver;

use crate::boundary::BoundaryConditionSet;
use crate::conditions::StepConditionComposite;
use crate::error::FdmError;
use crate::inner_value::InnerValueCalculator;
use crate::mesher::MesherComposite;

/// Snapshot offset used for theta: one solve is recorded this far from
/// the evaluation time and differenced against the final surface.
pub const THETA_SNAPSHOT_TIME: f64 = 0.99e-4;

/// The complete, side-effect-free specification of one solve.
///
/// The descriptor exclusively owns its components; nothing is shared
/// across solves. The grid's dimensionality and point counts are fixed
/// by the mesher and never change afterwards.
pub struct SolverDesc {
    /// The spatial grid.
    pub mesher: MesherComposite,
    /// Conditions pinning the grid's outer layers.
    pub boundaries: BoundaryConditionSet,
    /// Event-driven transformations (exercise, dividends).
    pub conditions: StepConditionComposite,
    /// Terminal/intrinsic value supplier.
    pub calculator: Box<dyn InnerValueCalculator>,
    /// Maturity as a year fraction from the evaluation date.
    pub maturity: f64,
    /// Number of time steps for the main scheme.
    pub time_steps: usize,
    /// Number of fully implicit damping steps prepended to the sweep.
    pub damping_steps: usize,
}

impl SolverDesc {
    pub(crate) fn validate(&self) -> Result<(), FdmError> {
        if !(self.maturity > 0.0) || !self.maturity.is_finite() {
            return Err(FdmError::InvalidConfiguration(format!(
                "maturity must be positive and finite, got {}",
                self.maturity
            )));
        }
        if self.time_steps == 0 {
            return Err(FdmError::InvalidConfiguration(
                "at least one time step is required".to_string(),
            ));
        }
        // the result interpolator needs a cubic stencil per dimension
        if let Some(&n) = self
            .mesher
            .layout()
            .dims()
            .iter()
            .find(|&&n| n < 4)
        {
            return Err(FdmError::InvalidConfiguration(format!(
                "each grid dimension needs at least 4 points for result interpolation, got {}",
                n
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SolverDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverDesc")
            .field("dims", &self.mesher.layout().dims())
            .field("maturity", &self.maturity)
            .field("time_steps", &self.time_steps)
            .field("damping_steps", &self.damping_steps)
            .finish()
    }
}
