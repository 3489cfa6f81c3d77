//! Boundary conditions applied to the outer layers of the grid.
//!
//! The solver invokes the whole set after each explicit operator
//! application and after the implicit solves of a time step; a
//! condition's `set_time` is called once per step with the time the
//! sweep is moving to, so time-dependent values are evaluated at the
//! current backward-sweep time.

mod dirichlet;

pub use dirichlet::{DirichletBoundary, TimeDepDirichletBoundary};

use crate::layout::OpLayout;

/// Which side of a direction a condition is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundarySide {
    /// The first layer along the direction.
    Lower,
    /// The last layer along the direction.
    Upper,
}

/// Linear indices of the grid points on one boundary layer.
pub(crate) fn boundary_indices(
    layout: &OpLayout,
    direction: usize,
    side: BoundarySide,
) -> Vec<usize> {
    let edge = match side {
        BoundarySide::Lower => 0,
        BoundarySide::Upper => layout.dims()[direction] - 1,
    };
    (0..layout.size())
        .filter(|&i| layout.coord(i, direction) == edge)
        .collect()
}

/// A constraint on the grid's outer layer.
///
/// Implementations overwrite or adjust boundary values; they never
/// change the grid's interior.
pub trait BoundaryCondition {
    /// Announce the time the sweep is moving to. Time-independent
    /// conditions ignore this.
    fn set_time(&mut self, _t: f64) {}

    /// Enforce the condition after an explicit operator application.
    fn apply_after_applying(&self, a: &mut [f64]);

    /// Enforce the condition after the implicit solves of a step.
    fn apply_after_solving(&self, a: &mut [f64]);
}

/// Ordered collection of boundary conditions.
///
/// An empty set is valid and common: operators whose one-sided edge rows
/// already encode the boundary behaviour (e.g. a degenerate variance
/// boundary) attach no explicit condition.
#[derive(Default)]
pub struct BoundaryConditionSet {
    conditions: Vec<Box<dyn BoundaryCondition>>,
}

impl BoundaryConditionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition; application order follows insertion order.
    pub fn push(&mut self, condition: Box<dyn BoundaryCondition>) {
        self.conditions.push(condition);
    }

    /// True if no condition is attached.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Propagate the current sweep time to every condition.
    pub fn set_time(&mut self, t: f64) {
        for c in &mut self.conditions {
            c.set_time(t);
        }
    }

    /// Apply every condition after an explicit operator application.
    pub fn apply_after_applying(&self, a: &mut [f64]) {
        for c in &self.conditions {
            c.apply_after_applying(a);
        }
    }

    /// Apply every condition after the implicit solves of a step.
    pub fn apply_after_solving(&self, a: &mut [f64]) {
        for c in &self.conditions {
            c.apply_after_solving(a);
        }
    }
}

impl std::fmt::Debug for BoundaryConditionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryConditionSet")
            .field("len", &self.conditions.len())
            .finish()
    }
}
