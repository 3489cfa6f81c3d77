//! Plain vanilla payoff definitions.

use crate::error::ModelError;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy: `max(S - K, 0)`.
    Call,
    /// Right to sell: `max(K - S, 0)`.
    Put,
}

impl OptionType {
    /// The opposite payoff type.
    #[inline]
    pub fn opposite(&self) -> Self {
        match self {
            OptionType::Call => OptionType::Put,
            OptionType::Put => OptionType::Call,
        }
    }
}

/// Striked vanilla payoff.
///
/// The finite-difference core consumes this as a pure function of the
/// spatial coordinate; [`to_fn`](Self::to_fn) produces that closure.
/// No smoothing is applied — the kink is handled by cell averaging on
/// the terminal grid instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaPayoff {
    option_type: OptionType,
    strike: f64,
}

impl VanillaPayoff {
    /// Construct a payoff; the strike must be positive and finite.
    pub fn new(option_type: OptionType, strike: f64) -> Result<Self, ModelError> {
        if !(strike > 0.0) || !strike.is_finite() {
            return Err(ModelError::parameter(
                "strike",
                strike,
                "must be positive and finite",
            ));
        }
        Ok(Self {
            option_type,
            strike,
        })
    }

    /// The payoff type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// The strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Intrinsic value at spot `s`.
    #[inline]
    pub fn value(&self, s: f64) -> f64 {
        match self.option_type {
            OptionType::Call => (s - self.strike).max(0.0),
            OptionType::Put => (self.strike - s).max(0.0),
        }
    }

    /// The payoff as a boxed pure function, the shape the inner-value
    /// calculators and boundary conditions consume.
    pub fn to_fn(&self) -> Box<dyn Fn(f64) -> f64> {
        let payoff = *self;
        Box::new(move |s| payoff.value(s))
    }
}
