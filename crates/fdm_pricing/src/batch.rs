//! Parallel pricing of independent options.
//!
//! The core contract keeps one solve strictly sequential; parallelism
//! lives across pricing calls. Engines are immutable during `price`, so
//! a strip of options can fan out over a thread pool with no shared
//! mutable state — the cached-pricing path is excluded by construction
//! (it needs `&mut` access to its cache).

use crate::engines::VanillaEngine;
use crate::error::PricingError;
use crate::results::PricingResults;
use fdm_models::instrument::VanillaOption;
use rayon::prelude::*;

/// Price every option with the same engine, in parallel.
///
/// Results come back in input order regardless of scheduling, and each
/// entry is the same value a sequential call would produce.
pub fn price_all<E>(
    engine: &E,
    options: &[VanillaOption],
) -> Vec<Result<PricingResults, PricingError>>
where
    E: VanillaEngine + Sync,
{
    options.par_iter().map(|o| engine.price(o)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::FdBlackScholesVanillaEngine;
    use fdm_core::market_data::FlatCurve;
    use fdm_models::exercise::Exercise;
    use fdm_models::models::BlackScholesParams;
    use fdm_models::payoff::{OptionType, VanillaPayoff};

    #[test]
    fn test_parallel_matches_sequential() {
        let params = BlackScholesParams::new(100.0, 0.2).unwrap();
        let engine = FdBlackScholesVanillaEngine::new(
            params,
            FlatCurve::new(0.05),
            FlatCurve::new(0.0),
        )
        .with_grid(30, 61);

        let options: Vec<VanillaOption> = [80.0, 90.0, 100.0, 110.0, 120.0]
            .iter()
            .map(|&k| {
                VanillaOption::new(
                    VanillaPayoff::new(OptionType::Call, k).unwrap(),
                    Exercise::european(1.0).unwrap(),
                )
                .unwrap()
            })
            .collect();

        let parallel = price_all(&engine, &options);
        for (option, result) in options.iter().zip(&parallel) {
            let sequential = engine.price(option).unwrap();
            let value = result.as_ref().unwrap();
            assert_eq!(
                value, &sequential,
                "parallel result differs for strike {}",
                option.payoff.strike()
            );
        }
    }
}
