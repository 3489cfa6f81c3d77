//! Error types for the finite-difference core.
//!
//! Two enums cover the crate:
//! - [`InterpolationError`]: failures when reading values off a solved
//!   grid or constructing an interpolant
//! - [`FdmError`]: everything else, from invalid mesher configuration to
//!   a non-converging iterative solve
//!
//! Configuration errors are raised eagerly at construction, before any
//! numerical work; the backward sweep itself never fails mid-flight.

use thiserror::Error;

/// Errors from interpolation of grid data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Fewer data points than the interpolation scheme requires.
    #[error("insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points supplied.
        got: usize,
        /// Minimum number of points required.
        need: usize,
    },

    /// Query point outside the interpolation domain.
    #[error("point {x} outside interpolation domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point.
        x: f64,
        /// Lower end of the domain.
        min: f64,
        /// Upper end of the domain.
        max: f64,
    },

    /// Malformed input data (mismatched lengths, unsorted abscissae, ...).
    #[error("invalid interpolation input: {0}")]
    InvalidInput(String),
}

/// Errors from the finite-difference machinery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FdmError {
    /// Invalid mesher configuration (too few points, non-increasing
    /// coordinates, degenerate concentration).
    #[error("invalid mesher: {0}")]
    InvalidMesher(String),

    /// Invalid solver or component configuration detected at
    /// construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failure while interpolating the solved value surface.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// The iterative linear solve inside a fully implicit step did not
    /// reach the requested tolerance.
    #[error("iterative linear solve did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence {
        /// Iterations performed before giving up.
        iterations: usize,
        /// Relative residual at the last iteration.
        residual: f64,
    },

    /// A NaN or infinity surfaced when reading results off the grid.
    #[error("non-finite value encountered in {0}")]
    NonFinite(String),
}
