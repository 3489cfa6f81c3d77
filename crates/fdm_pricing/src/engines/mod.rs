//! The vanilla pricing engines.

mod black_scholes;
mod cev;
mod heston;
mod sabr;

pub use black_scholes::FdBlackScholesVanillaEngine;
pub use cev::{BoundaryPricer, FdCevVanillaEngine};
pub use heston::FdHestonVanillaEngine;
pub use sabr::FdSabrVanillaEngine;

use crate::error::PricingError;
use crate::results::PricingResults;
use fdm_core::conditions::{
    AmericanExerciseCondition, BermudanExerciseCondition, DividendCondition,
    StepConditionComposite,
};
use fdm_core::inner_value::InnerValueCalculator;
use fdm_core::mesher::MesherComposite;
use fdm_models::exercise::Exercise;
use fdm_models::instrument::VanillaOption;

/// A pricing engine for vanilla options.
///
/// One call runs one strictly sequential solve; engines are immutable
/// and may be shared across threads for independent calls.
pub trait VanillaEngine {
    /// Price `option`, returning value and sensitivities at the
    /// engine's evaluation point.
    fn price(&self, option: &VanillaOption) -> Result<PricingResults, PricingError>;
}

/// Assembles the step-condition composite for a vanilla option:
/// dividends first, then the exercise projection, so coincident events
/// resolve on the ex-dividend price.
///
/// `spots` is the payoff axis in spot space (log grids pass the
/// exponentiated axis); it is only needed when dividends are present.
pub(crate) fn vanilla_conditions(
    mesher: &MesherComposite,
    calculator: &dyn InnerValueCalculator,
    exercise: &Exercise,
    dividends: &[(f64, f64)],
    spots: Vec<f64>,
    maturity: f64,
) -> StepConditionComposite {
    let mut composite = StepConditionComposite::new();

    let live: Vec<(f64, f64)> = dividends
        .iter()
        .copied()
        .filter(|(t, _)| *t > 0.0 && *t <= maturity)
        .collect();
    if !live.is_empty() {
        let times: Vec<f64> = live.iter().map(|(t, _)| *t).collect();
        let amounts: Vec<f64> = live.iter().map(|(_, a)| *a).collect();
        let condition = DividendCondition::new(
            mesher.layout().clone(),
            0,
            spots,
            times.clone(),
            amounts,
        );
        composite.push(Box::new(condition), &times);
    }

    match exercise {
        Exercise::European { .. } => {}
        Exercise::American { .. } => {
            let intrinsic: Vec<f64> = (0..mesher.size())
                .map(|i| calculator.inner_value(mesher, i, maturity))
                .collect();
            composite.push(Box::new(AmericanExerciseCondition::new(intrinsic)), &[]);
        }
        Exercise::Bermudan { times } => {
            let intrinsic: Vec<f64> = (0..mesher.size())
                .map(|i| calculator.inner_value(mesher, i, maturity))
                .collect();
            composite.push(
                Box::new(BermudanExerciseCondition::new(times.clone(), intrinsic)),
                times,
            );
        }
    }

    composite
}

/// Greek mapping for log-spot grids: the solver differentiates in
/// `x = ln S`, the results are quoted in `S`.
pub(crate) fn log_greeks(value_x: f64, value_xx: f64, spot: f64) -> (f64, f64) {
    let delta = value_x / spot;
    let gamma = (value_xx - value_x) / (spot * spot);
    (delta, gamma)
}
