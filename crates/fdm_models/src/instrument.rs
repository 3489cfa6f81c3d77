//! Vanilla option instrument.

use crate::error::ModelError;
use crate::exercise::Exercise;
use crate::payoff::VanillaPayoff;

/// A vanilla option: one striked payoff plus an exercise schedule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaOption {
    /// The payoff.
    pub payoff: VanillaPayoff,
    /// The exercise schedule.
    pub exercise: Exercise,
}

impl VanillaOption {
    /// Bundle a payoff and an exercise schedule.
    pub fn new(payoff: VanillaPayoff, exercise: Exercise) -> Result<Self, ModelError> {
        Ok(Self { payoff, exercise })
    }

    /// The maturity of the backward sweep: the last exercise time.
    pub fn maturity(&self) -> f64 {
        self.exercise.last_time()
    }
}
