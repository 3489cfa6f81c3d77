//! Grid snapshot at a fixed time.

use super::{StepCondition, TIME_EPS};

/// Records a copy of the grid when the sweep reaches `time`.
///
/// The solvers install one a fraction of a day away from the evaluation
/// time and difference it against the final surface to obtain theta.
#[derive(Debug, Clone)]
pub struct SnapshotCondition {
    time: f64,
    values: Option<Vec<f64>>,
}

impl SnapshotCondition {
    /// Snapshot at `time`.
    pub fn new(time: f64) -> Self {
        Self { time, values: None }
    }

    /// The snapshot time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The recorded grid, if the sweep has passed the snapshot time.
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }
}

impl StepCondition for SnapshotCondition {
    fn apply_to(&mut self, a: &mut [f64], t: f64) {
        if (t - self.time).abs() <= TIME_EPS {
            self.values = Some(a.to_vec());
        }
    }
}
