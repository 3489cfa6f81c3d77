//! Early-exercise step conditions.

use super::{StepCondition, TIME_EPS};

/// American-style exercise: the continuation value is floored by the
/// intrinsic value at every reached time point.
///
/// The intrinsic array is precomputed from the inner-value calculator at
/// construction, so the condition owns everything it needs for the
/// sweep.
#[derive(Debug, Clone)]
pub struct AmericanExerciseCondition {
    intrinsic: Vec<f64>,
}

impl AmericanExerciseCondition {
    /// Build from the grid's intrinsic values.
    pub fn new(intrinsic: Vec<f64>) -> Self {
        Self { intrinsic }
    }
}

impl StepCondition for AmericanExerciseCondition {
    fn apply_to(&mut self, a: &mut [f64], _t: f64) {
        debug_assert_eq!(a.len(), self.intrinsic.len());
        for (v, &iv) in a.iter_mut().zip(&self.intrinsic) {
            if *v < iv {
                *v = iv;
            }
        }
    }
}

/// Bermudan-style exercise: the same projection, restricted to a list of
/// exercise times.
#[derive(Debug, Clone)]
pub struct BermudanExerciseCondition {
    exercise_times: Vec<f64>,
    intrinsic: Vec<f64>,
}

impl BermudanExerciseCondition {
    /// Build from the exercise schedule and the grid's intrinsic values.
    pub fn new(exercise_times: Vec<f64>, intrinsic: Vec<f64>) -> Self {
        Self {
            exercise_times,
            intrinsic,
        }
    }
}

impl StepCondition for BermudanExerciseCondition {
    fn apply_to(&mut self, a: &mut [f64], t: f64) {
        if !self
            .exercise_times
            .iter()
            .any(|&et| (et - t).abs() <= TIME_EPS)
        {
            return;
        }
        debug_assert_eq!(a.len(), self.intrinsic.len());
        for (v, &iv) in a.iter_mut().zip(&self.intrinsic) {
            if *v < iv {
                *v = iv;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::StepCondition;

    #[test]
    fn test_american_floors_by_intrinsic() {
        let mut cond = AmericanExerciseCondition::new(vec![5.0, 0.0, 2.0]);
        let mut a = vec![4.0, 1.0, 3.0];
        cond.apply_to(&mut a, 0.37);
        assert_eq!(a, vec![5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_american_applies_at_any_time() {
        let mut cond = AmericanExerciseCondition::new(vec![1.0]);
        for &t in &[0.0, 0.123, 0.9] {
            let mut a = vec![0.5];
            cond.apply_to(&mut a, t);
            assert_eq!(a, vec![1.0]);
        }
    }

    #[test]
    fn test_bermudan_only_at_exercise_times() {
        let mut cond = BermudanExerciseCondition::new(vec![0.5], vec![10.0]);

        let mut a = vec![1.0];
        cond.apply_to(&mut a, 0.4);
        assert_eq!(a, vec![1.0], "no-op away from exercise times");

        cond.apply_to(&mut a, 0.5);
        assert_eq!(a, vec![10.0]);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let mut cond = AmericanExerciseCondition::new(vec![3.0, 1.0]);
        let mut a = vec![2.0, 2.0];
        cond.apply_to(&mut a, 0.1);
        let once = a.clone();
        cond.apply_to(&mut a, 0.1);
        assert_eq!(a, once);
    }
}
