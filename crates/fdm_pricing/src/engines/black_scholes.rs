//! Finite-difference Black-Scholes vanilla engine.

use crate::engines::{log_greeks, vanilla_conditions, VanillaEngine};
use crate::error::PricingError;
use crate::results::PricingResults;
use fdm_core::boundary::BoundaryConditionSet;
use fdm_core::inner_value::CellAveragingInnerValue;
use fdm_core::market_data::YieldCurve;
use fdm_core::mesher::MesherComposite;
use fdm_core::solver::{Fdm1dSolver, SchemeDesc, SolverDesc};
use fdm_models::instrument::VanillaOption;
use fdm_models::meshers::black_scholes_mesher;
use fdm_models::models::BlackScholesParams;
use fdm_models::operators::BlackScholesOp;
use tracing::debug;

/// Tail probability of the grid truncation.
const MESHER_EPS: f64 = 1e-4;

/// Widening factor of the truncation range.
const MESHER_SCALE: f64 = 1.5;

/// Prices vanilla options under lognormal dynamics on a 1-D log-spot
/// grid.
///
/// Supports European, American and Bermudan exercise and discrete cash
/// dividends. Configuration follows the builder idiom:
///
/// ```
/// use fdm_core::market_data::FlatCurve;
/// use fdm_core::solver::SchemeDesc;
/// use fdm_models::models::BlackScholesParams;
/// use fdm_pricing::engines::FdBlackScholesVanillaEngine;
///
/// let params = BlackScholesParams::new(100.0, 0.2).unwrap();
/// let engine =
///     FdBlackScholesVanillaEngine::new(params, FlatCurve::new(0.05), FlatCurve::new(0.0))
///         .with_grid(200, 400)
///         .with_damping_steps(2)
///         .with_scheme(SchemeDesc::craig_sneyd());
/// ```
pub struct FdBlackScholesVanillaEngine<R: YieldCurve, Q: YieldCurve> {
    params: BlackScholesParams,
    r_curve: R,
    q_curve: Q,
    t_grid: usize,
    x_grid: usize,
    damping_steps: usize,
    scheme: SchemeDesc,
    dividends: Vec<(f64, f64)>,
}

impl<R, Q> FdBlackScholesVanillaEngine<R, Q>
where
    R: YieldCurve + Clone + 'static,
    Q: YieldCurve + Clone + 'static,
{
    /// Engine with default grid (100 x 100), no damping, Douglas
    /// scheme and no dividends.
    pub fn new(params: BlackScholesParams, r_curve: R, q_curve: Q) -> Self {
        Self {
            params,
            r_curve,
            q_curve,
            t_grid: 100,
            x_grid: 100,
            damping_steps: 0,
            scheme: SchemeDesc::douglas(),
            dividends: Vec::new(),
        }
    }

    /// Time and space grid sizes.
    pub fn with_grid(mut self, t_grid: usize, x_grid: usize) -> Self {
        self.t_grid = t_grid;
        self.x_grid = x_grid;
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
}

impl<R, Q> VanillaEngine for FdBlackScholesVanillaEngine<R, Q>
where
    R: YieldCurve + Clone + 'static,
    Q: YieldCurve + Clone + 'static,
{
    fn price(&self, option: &VanillaOption) -> Result<PricingResults, PricingError> {
        let maturity = option.maturity();
        let strike = option.payoff.strike();
        let spot = self.params.spot;

        // 1. mesher
        let mesher = MesherComposite::from_single(black_scholes_mesher(
            self.x_grid,
            spot,
            self.params.volatility,
            maturity,
            strike,
            &self.r_curve,
            &self.q_curve,
            MESHER_EPS,
            MESHER_SCALE,
            &self.dividends,
        )?)?;
        debug!(
            x_grid = self.x_grid,
            t_grid = self.t_grid,
            maturity,
            "pricing vanilla option on log-spot grid"
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

        // 4. boundary conditions: the one-sided edge rows of the
        // operator already encode linear behaviour at the truncated
        // boundaries
        let boundaries = BoundaryConditionSet::new();

        // 5. solver
        let op = BlackScholesOp::new(
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
        let solver = Fdm1dSolver::new(desc, self.scheme, Box::new(op))?;

        let x = spot.ln();
        let value = solver.interpolate_at(x)?;
        let (delta, gamma) =
            log_greeks(solver.derivative_x(x)?, solver.derivative_xx(x)?, spot);
        let theta = solver.theta_at(x)?;

        Ok(PricingResults {
            value,
            delta,
            gamma,
            theta,
        })
    }
}
