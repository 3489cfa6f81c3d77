//! Finite-difference Heston vanilla engine.

use crate::cache::ResultsCache;
use crate::engines::{log_greeks, vanilla_conditions, VanillaEngine};
use crate::error::PricingError;
use crate::results::PricingResults;
use fdm_core::boundary::BoundaryConditionSet;
use fdm_core::inner_value::CellAveragingInnerValue;
use fdm_core::market_data::YieldCurve;
use fdm_core::mesher::MesherComposite;
use fdm_core::solver::{Fdm2dSolver, SchemeDesc, SolverDesc};
use fdm_models::instrument::VanillaOption;
use fdm_models::meshers::{black_scholes_mesher, heston_variance_mesher};
use fdm_models::models::HestonParams;
use fdm_models::operators::HestonOp;
use fdm_models::payoff::VanillaPayoff;
use tracing::debug;

/// Tail probability of the equity-grid truncation.
const MESHER_EPS: f64 = 1e-4;

/// Widening factor of the equity-grid truncation range.
const MESHER_SCALE: f64 = 2.0;

/// Prices vanilla options under Heston dynamics on a 2-D log-spot x
/// variance grid.
///
/// The variance mesher supplies the average-volatility estimate the
/// equity mesher sizes its range from. No explicit boundary conditions
/// are attached: the degenerate variance edges and the truncated spot
/// edges are handled by the operator's one-sided rows.
///
/// With [`with_cached_strikes`](Self::with_cached_strikes) configured,
/// [`price_with_cache`](Self::price_with_cache) reuses one solved
/// surface for a whole strike strip, rescaling by the strike ratio
/// instead of re-solving — a pure optimisation whose entries are only
/// valid while the engine configuration stays unchanged.
pub struct FdHestonVanillaEngine<R: YieldCurve, Q: YieldCurve> {
    params: HestonParams,
    r_curve: R,
    q_curve: Q,
    t_grid: usize,
    x_grid: usize,
    v_grid: usize,
    damping_steps: usize,
    scheme: SchemeDesc,
    dividends: Vec<(f64, f64)>,
    cached_strikes: Vec<f64>,
}

impl<R, Q> FdHestonVanillaEngine<R, Q>
where
    R: YieldCurve + Clone + 'static,
    Q: YieldCurve + Clone + 'static,
{
    /// Engine with default grid (100 time, 100 spot, 50 variance), no
    /// damping and the Hundsdorfer scheme.
    pub fn new(params: HestonParams, r_curve: R, q_curve: Q) -> Self {
        Self {
            params,
            r_curve,
            q_curve,
            t_grid: 100,
            x_grid: 100,
            v_grid: 50,
            damping_steps: 0,
            scheme: SchemeDesc::hundsdorfer(),
            dividends: Vec::new(),
            cached_strikes: Vec::new(),
        }
    }

    /// Time, spot and variance grid sizes.
    pub fn with_grid(mut self, t_grid: usize, x_grid: usize, v_grid: usize) -> Self {
        self.t_grid = t_grid;
        self.x_grid = x_grid;
        self.v_grid = v_grid;
        self
    }

    /// Number of fully implicit damping steps.
    pub fn with_damping_steps(mut self, damping_steps: usize) -> Self {
        self.damping_steps = damping_steps;
        self
    }

    /// Splitting scheme.
    pub fn with_scheme(mut self, scheme: SchemeDesc) -> Self {
        self.scheme = scheme;
        self
    }

    /// Discrete cash dividends as `(time, amount)` pairs.
    pub fn with_dividends(mut self, dividends: Vec<(f64, f64)>) -> Self {
        self.dividends = dividends;
        self
    }

    /// Enable multiple-strike caching: after one solve, results for
    /// these strikes are derived from the same surface.
    pub fn with_cached_strikes(mut self, strikes: Vec<f64>) -> Self {
        self.cached_strikes = strikes;
        self
    }

    fn validate(&self) -> Result<(), PricingError> {
        if !self.cached_strikes.is_empty() && !self.dividends.is_empty() {
            return Err(PricingError::InvalidInput(
                "multiple-strike caching does not work with discrete dividends"
                    .to_string(),
            ));
        }
        if self.cached_strikes.iter().any(|k| !(*k > 0.0)) {
            return Err(PricingError::InvalidInput(
                "cached strikes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn solve(&self, option: &VanillaOption) -> Result<Fdm2dSolver, PricingError> {
        let maturity = option.maturity();
        let strike = option.payoff.strike();

        // 1. meshers: variance first, its vol estimate sizes the
        // equity range
        let variance = heston_variance_mesher(self.v_grid, &self.params, maturity)?;
        let equity = black_scholes_mesher(
            self.x_grid,
            self.params.spot,
            variance.vol_estimate,
            maturity,
            strike,
            &self.r_curve,
            &self.q_curve,
            MESHER_EPS,
            MESHER_SCALE,
            &self.dividends,
        )?;
        let mesher = MesherComposite::new_2d(equity, variance.mesher)?;
        debug!(
            x_grid = self.x_grid,
            v_grid = self.v_grid,
            t_grid = self.t_grid,
            vol_estimate = variance.vol_estimate,
            "pricing vanilla option on Heston grid"
        );

        // 2. calculator
        let calculator =
            CellAveragingInnerValue::new_log(option.payoff.to_fn(), 0, Some(strike));

        // 3. step conditions
        let spots: Vec<f64> = mesher.locations(0).iter().map(|x| x.exp()).collect();
        let conditions = vanilla_conditions(
            &mesher,
            &calculator,
            &option.exercise,
            &self.dividends,
            spots,
            maturity,
        );

        // 4. boundary conditions
        let boundaries = BoundaryConditionSet::new();

        // 5. solver
        let op = HestonOp::new(
            &mesher,
            &self.params,
            self.r_curve.clone(),
            self.q_curve.clone(),
        )?;
        let desc = SolverDesc {
            mesher,
            boundaries,
            conditions,
            calculator: Box::new(calculator),
            maturity,
            time_steps: self.t_grid,
            damping_steps: self.damping_steps,
        };
        Ok(Fdm2dSolver::new(desc, self.scheme, Box::new(op))?)
    }

    fn results_at(&self, solver: &Fdm2dSolver, spot: f64) -> Result<PricingResults, PricingError> {
        let x = spot.ln();
        let v0 = self.params.v0;
        let value = solver.interpolate_at(x, v0)?;
        let (delta, gamma) = log_greeks(
            solver.derivative_x(x, v0)?,
            solver.derivative_xx(x, v0)?,
            spot,
        );
        let theta = solver.theta_at(x, v0)?;
        Ok(PricingResults {
            value,
            delta,
            gamma,
            theta,
        })
    }

    /// Price through an externally owned results cache.
    ///
    /// A hit returns the cached results; a miss solves once and also
    /// populates the cache for every configured strike by rescaling
    /// the solved surface with the strike ratio. Not thread-safe: the
    /// cache is the caller's to guard or to keep per call.
    pub fn price_with_cache(
        &self,
        option: &VanillaOption,
        cache: &mut ResultsCache,
    ) -> Result<PricingResults, PricingError> {
        self.validate()?;
        if let Some(results) = cache.lookup(option) {
            return Ok(results);
        }

        let solver = self.solve(option)?;
        let results = self.results_at(&solver, self.params.spot)?;
        cache.insert(option, results);

        let strike = option.payoff.strike();
        for &other in &self.cached_strikes {
            let d = strike / other;
            let shifted_spot = self.params.spot * d;
            // strikes whose rescaled query point leaves the grid are
            // simply not cached; a later call solves them from scratch
            let Ok(shifted) = self.results_at(&solver, shifted_spot) else {
                continue;
            };
            let rescaled = PricingResults {
                value: shifted.value / d,
                delta: shifted.delta,
                gamma: shifted.gamma * d,
                theta: shifted.theta / d,
            };
            let rescaled_option = VanillaOption::new(
                VanillaPayoff::new(option.payoff.option_type(), other)?,
                option.exercise.clone(),
            )?;
            cache.insert(&rescaled_option, rescaled);
        }

        Ok(results)
    }
}

impl<R, Q> VanillaEngine for FdHestonVanillaEngine<R, Q>
where
    R: YieldCurve + Clone + 'static,
    Q: YieldCurve + Clone + 'static,
{
    fn price(&self, option: &VanillaOption) -> Result<PricingResults, PricingError> {
        self.validate()?;
        let solver = self.solve(option)?;
        self.results_at(&solver, self.params.spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdm_core::market_data::FlatCurve;
    use fdm_models::exercise::Exercise;
    use fdm_models::payoff::OptionType;

    fn engine() -> FdHestonVanillaEngine<FlatCurve, FlatCurve> {
        let params = HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, -0.7).unwrap();
        FdHestonVanillaEngine::new(params, FlatCurve::new(0.05), FlatCurve::new(0.0))
            .with_grid(20, 41, 21)
    }

    fn call(strike: f64) -> VanillaOption {
        VanillaOption::new(
            VanillaPayoff::new(OptionType::Call, strike).unwrap(),
            Exercise::european(1.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_multi_strike_with_dividends_rejected() {
        let result = engine()
            .with_dividends(vec![(0.5, 2.0)])
            .with_cached_strikes(vec![90.0, 110.0])
            .price(&call(100.0));
        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_cached_strike_rejected() {
        let result = engine()
            .with_cached_strikes(vec![-10.0])
            .price(&call(100.0));
        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn test_cache_hit_avoids_resolve() {
        let engine = engine().with_cached_strikes(vec![95.0, 105.0]);
        let mut cache = ResultsCache::new();
        let first = engine.price_with_cache(&call(100.0), &mut cache).unwrap();
        // 100 strike plus the two configured ones
        assert_eq!(cache.len(), 3);

        let again = engine.price_with_cache(&call(100.0), &mut cache).unwrap();
        assert_eq!(first, again);

        let neighbour = engine.price_with_cache(&call(95.0), &mut cache).unwrap();
        assert!(neighbour.value > first.value);
        assert_eq!(cache.len(), 3, "neighbour strike came from the cache");
    }
}
