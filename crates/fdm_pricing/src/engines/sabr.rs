//! Finite-difference SABR vanilla engine.

use crate::engines::{vanilla_conditions, VanillaEngine};
use crate::error::PricingError;
use crate::results::PricingResults;
use fdm_core::boundary::{BoundaryConditionSet, BoundarySide, TimeDepDirichletBoundary};
use fdm_core::inner_value::CellAveragingInnerValue;
use fdm_core::market_data::YieldCurve;
use fdm_core::math::inverse_norm_cdf;
use fdm_core::mesher::{Mesher1d, MesherComposite};
use fdm_core::solver::{Fdm2dSolver, SchemeDesc, SolverDesc};
use fdm_models::instrument::VanillaOption;
use fdm_models::meshers::cev_mesher;
use fdm_models::models::SabrParams;
use fdm_models::operators::SabrOp;
use tracing::debug;

/// Tail probability of the grid truncation.
const MESHER_EPS: f64 = 1e-4;

/// Concentration density around the strike on the forward axis.
const STRIKE_DENSITY: f64 = 0.025;

/// Concentration density around the initial log-volatility.
const VOL_DENSITY: f64 = 0.1;

/// Prices vanilla options under SABR dynamics on a 2-D forward x
/// log-volatility grid.
///
/// The forward axis reuses the CEV mesher, widened with a high
/// volatility quantile so the grid still covers the forward
/// distribution when the stochastic volatility drifts up; both forward
/// edges carry discounted-payoff Dirichlet conditions.
pub struct FdSabrVanillaEngine<R: YieldCurve> {
    params: SabrParams,
    r_curve: R,
    t_grid: usize,
    f_grid: usize,
    x_grid: usize,
    damping_steps: usize,
    scale_factor: f64,
    scheme: SchemeDesc,
}

impl<R> FdSabrVanillaEngine<R>
where
    R: YieldCurve + Clone + 'static,
{
    /// Engine with default grid (50 time, 400 forward, 50 log-vol), one
    /// damping step and the Hundsdorfer scheme.
    pub fn new(params: SabrParams, r_curve: R) -> Self {
        Self {
            params,
            r_curve,
            t_grid: 50,
            f_grid: 400,
            x_grid: 50,
            damping_steps: 1,
            scale_factor: 1.5,
            scheme: SchemeDesc::hundsdorfer(),
        }
    }

    /// Time, forward and log-volatility grid sizes.
    pub fn with_grid(mut self, t_grid: usize, f_grid: usize, x_grid: usize) -> Self {
        self.t_grid = t_grid;
        self.f_grid = f_grid;
        self.x_grid = x_grid;
        self
    }

    /// Number of fully implicit damping steps.
    pub fn with_damping_steps(mut self, damping_steps: usize) -> Self {
        self.damping_steps = damping_steps;
        self
    }

    /// Widening factor of the truncation ranges.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Splitting scheme.
    pub fn with_scheme(mut self, scheme: SchemeDesc) -> Self {
        self.scheme = scheme;
        self
    }
}

impl<R> VanillaEngine for FdSabrVanillaEngine<R>
where
    R: YieldCurve + Clone + 'static,
{
    fn price(&self, option: &VanillaOption) -> Result<PricingResults, PricingError> {
        let maturity = option.maturity();
        let strike = option.payoff.strike();
        let params = &self.params;

        // 1. meshers: the forward axis is a CEV grid sized with a high
        // quantile of the volatility distribution
        let upper_alpha = params.alpha
            * (params.nu * maturity.sqrt() * inverse_norm_cdf(0.75)).exp();
        let f_mesher = cev_mesher(
            self.f_grid,
            params.f0,
            upper_alpha,
            params.beta,
            maturity,
            MESHER_EPS,
            self.scale_factor,
            (strike, STRIKE_DENSITY),
        )?;

        let x0 = params.alpha.ln();
        let log_drift = -0.5 * params.nu * params.nu * maturity;
        let vol_range = params.nu
            * maturity.sqrt()
            * inverse_norm_cdf(1.0 - MESHER_EPS)
            * self.scale_factor;
        let x_min = (x0 + log_drift - vol_range).min(x0 - 0.01);
        let x_max = (x0 + log_drift + vol_range).max(x0 + 0.01);
        let x_mesher = Mesher1d::concentrating(
            x_min,
            x_max,
            self.x_grid,
            (x0, VOL_DENSITY),
        )
        .map_err(PricingError::Fdm)?;

        let lower_bound = f_mesher.locations()[0];
        let upper_bound = *f_mesher.locations().last().expect("non-empty grid");
        let mesher = MesherComposite::new_2d(f_mesher, x_mesher)?;
        debug!(
            f_grid = self.f_grid,
            x_grid = self.x_grid,
            t_grid = self.t_grid,
            upper_bound,
            "pricing vanilla option on SABR grid"
        );

        // 2. calculator
        let calculator =
            CellAveragingInnerValue::new(option.payoff.to_fn(), 0, Some(strike));

        // 3. step conditions
        let conditions = vanilla_conditions(
            &mesher,
            &calculator,
            &option.exercise,
            &[],
            Vec::new(),
            maturity,
        );

        // 4. boundary conditions: discounted terminal payoff on both
        // forward edges
        let mut boundaries = BoundaryConditionSet::new();
        boundaries.push(Box::new(TimeDepDirichletBoundary::discounted_cash_flow(
            &mesher,
            self.r_curve.clone(),
            maturity,
            option.payoff.value(upper_bound),
            0,
            BoundarySide::Upper,
        )));
        boundaries.push(Box::new(TimeDepDirichletBoundary::discounted_cash_flow(
            &mesher,
            self.r_curve.clone(),
            maturity,
            option.payoff.value(lower_bound),
            0,
            BoundarySide::Lower,
        )));

        // 5. solver
        let op = SabrOp::new(&mesher, params, self.r_curve.clone())?;
        let desc = SolverDesc {
            mesher,
            boundaries,
            conditions,
            calculator: Box::new(calculator),
            maturity,
            time_steps: self.t_grid,
            damping_steps: self.damping_steps,
        };
        let solver = Fdm2dSolver::new(desc, self.scheme, Box::new(op))?;

        Ok(PricingResults {
            value: solver.interpolate_at(params.f0, x0)?,
            delta: solver.derivative_x(params.f0, x0)?,
            gamma: solver.derivative_xx(params.f0, x0)?,
            theta: solver.theta_at(params.f0, x0)?,
        })
    }
}
