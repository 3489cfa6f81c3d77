//! Exercise schedules in year fractions.
//!
//! The core consumes fully resolved times; converting calendar dates
//! through a day-count convention is the caller's concern.

use crate::error::ModelError;

/// When an option may be exercised.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Exercise {
    /// Exercise only at expiry.
    European {
        /// Expiry time in years.
        expiry: f64,
    },

    /// Exercise at any time up to expiry.
    American {
        /// Expiry time in years.
        expiry: f64,
    },

    /// Exercise on a discrete list of dates.
    Bermudan {
        /// Exercise times in years, strictly increasing.
        times: Vec<f64>,
    },
}

impl Exercise {
    /// European exercise at `expiry`.
    pub fn european(expiry: f64) -> Result<Self, ModelError> {
        let exercise = Exercise::European { expiry };
        exercise.validate()?;
        Ok(exercise)
    }

    /// American exercise up to `expiry`.
    pub fn american(expiry: f64) -> Result<Self, ModelError> {
        let exercise = Exercise::American { expiry };
        exercise.validate()?;
        Ok(exercise)
    }

    /// Bermudan exercise on `times`.
    pub fn bermudan(times: Vec<f64>) -> Result<Self, ModelError> {
        let exercise = Exercise::Bermudan { times };
        exercise.validate()?;
        Ok(exercise)
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Exercise::European { expiry } | Exercise::American { expiry } => {
                if !(*expiry > 0.0) || !expiry.is_finite() {
                    return Err(ModelError::parameter(
                        "expiry",
                        *expiry,
                        "must be positive and finite",
                    ));
                }
            }
            Exercise::Bermudan { times } => {
                if times.is_empty() {
                    return Err(ModelError::InvalidConfiguration(
                        "Bermudan exercise needs at least one date".to_string(),
                    ));
                }
                if times.iter().any(|t| !(*t > 0.0) || !t.is_finite()) {
                    return Err(ModelError::InvalidConfiguration(
                        "Bermudan exercise times must be positive and finite".to_string(),
                    ));
                }
                if times.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(ModelError::InvalidConfiguration(
                        "Bermudan exercise times must be strictly increasing".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// The last exercise time — the maturity of the backward sweep.
    pub fn last_time(&self) -> f64 {
        match self {
            Exercise::European { expiry } | Exercise::American { expiry } => *expiry,
            Exercise::Bermudan { times } => *times.last().expect("validated non-empty"),
        }
    }

    /// True for styles with an early-exercise right.
    pub fn allows_early_exercise(&self) -> bool {
        !matches!(self, Exercise::European { .. })
    }

    /// A flat list of the schedule's times, used for value-equality
    /// cache keys.
    pub fn times(&self) -> Vec<f64> {
        match self {
            Exercise::European { expiry } | Exercise::American { expiry } => vec![*expiry],
            Exercise::Bermudan { times } => times.clone(),
        }
    }
}
