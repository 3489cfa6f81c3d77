//! Engine-level validation against closed forms and model identities.

use approx::assert_relative_eq;
use fdm_core::market_data::{FlatCurve, InterpolatedZeroCurve, YieldCurve};
use fdm_core::solver::SchemeDesc;
use fdm_models::analytical::BlackScholes;
use fdm_models::exercise::Exercise;
use fdm_models::instrument::VanillaOption;
use fdm_models::models::{BlackScholesParams, CevParams, HestonParams, SabrParams};
use fdm_models::payoff::{OptionType, VanillaPayoff};
use fdm_pricing::cache::ResultsCache;
use fdm_pricing::engines::{
    FdBlackScholesVanillaEngine, FdCevVanillaEngine, FdHestonVanillaEngine,
    FdSabrVanillaEngine,
};
use fdm_pricing::VanillaEngine;

const SPOT: f64 = 100.0;
const RATE: f64 = 0.05;
const VOL: f64 = 0.2;

fn european(option_type: OptionType, strike: f64, expiry: f64) -> VanillaOption {
    VanillaOption::new(
        VanillaPayoff::new(option_type, strike).unwrap(),
        Exercise::european(expiry).unwrap(),
    )
    .unwrap()
}

fn bs_engine(
    t_grid: usize,
    x_grid: usize,
) -> FdBlackScholesVanillaEngine<FlatCurve, FlatCurve> {
    let params = BlackScholesParams::new(SPOT, VOL).unwrap();
    FdBlackScholesVanillaEngine::new(params, FlatCurve::new(RATE), FlatCurve::new(0.0))
        .with_grid(t_grid, x_grid)
}

// ------------------------------------------------------------------
// Convergence to the Black-Scholes closed form
// ------------------------------------------------------------------

#[test]
fn bs_engine_converges_to_closed_form() {
    let reference = BlackScholes::new(SPOT, RATE, 0.0, VOL).unwrap();
    let exact = reference.price(OptionType::Call, 100.0, 1.0);

    let coarse = bs_engine(25, 51)
        .price(&european(OptionType::Call, 100.0, 1.0))
        .unwrap()
        .value;
    let fine = bs_engine(100, 201)
        .price(&european(OptionType::Call, 100.0, 1.0))
        .unwrap()
        .value;

    assert!((coarse - exact).abs() < 0.05, "coarse error too large");
    assert!((fine - exact).abs() < 0.01, "fine error too large");
    assert!(
        (fine - exact).abs() <= (coarse - exact).abs(),
        "refinement must not increase the error: coarse {}, fine {}",
        (coarse - exact).abs(),
        (fine - exact).abs()
    );
}

#[test]
fn bs_engine_matches_closed_form_across_schemes() {
    let reference = BlackScholes::new(SPOT, RATE, 0.0, VOL).unwrap();
    let exact = reference.price(OptionType::Put, 110.0, 1.0);
    let option = european(OptionType::Put, 110.0, 1.0);

    for scheme in [
        SchemeDesc::douglas(),
        SchemeDesc::craig_sneyd(),
        SchemeDesc::modified_craig_sneyd(),
        SchemeDesc::hundsdorfer(),
        SchemeDesc::implicit_euler(),
    ] {
        // implicit Euler is first order; the splitting schemes are
        // second order in time
        let tolerance = if scheme.kind == fdm_core::solver::SchemeKind::ImplicitEuler {
            0.1
        } else {
            0.05
        };
        let value = bs_engine(100, 201)
            .with_scheme(scheme)
            .price(&option)
            .unwrap()
            .value;
        assert!(
            (value - exact).abs() < tolerance,
            "{:?}: {} vs {}",
            scheme.kind,
            value,
            exact
        );
    }
}

#[test]
fn bs_engine_greeks_match_closed_form() {
    let reference = BlackScholes::new(SPOT, RATE, 0.0, VOL).unwrap();
    let results = bs_engine(100, 201)
        .price(&european(OptionType::Call, 100.0, 1.0))
        .unwrap();

    let delta = reference.delta(OptionType::Call, 100.0, 1.0);
    let gamma = reference.gamma(100.0, 1.0);
    let theta = reference.theta(OptionType::Call, 100.0, 1.0);

    assert!((results.delta - delta).abs() < 0.01, "delta {}", results.delta);
    assert!(
        (results.gamma - gamma).abs() < 0.1 * gamma,
        "gamma {} vs {}",
        results.gamma,
        gamma
    );
    assert!((results.theta - theta).abs() < 0.2, "theta {}", results.theta);
}

#[test]
fn bs_engine_with_interpolated_curve() {
    // a non-flat discounting curve exercises the forward-rate path of
    // set_time; sanity bounds come from the flat curves bracketing it
    let curve =
        InterpolatedZeroCurve::new(vec![0.0, 0.5, 1.0], vec![0.03, 0.05, 0.07]).unwrap();
    let params = BlackScholesParams::new(SPOT, VOL).unwrap();
    let engine = FdBlackScholesVanillaEngine::new(params, curve, FlatCurve::new(0.0))
        .with_grid(50, 101);
    let value = engine
        .price(&european(OptionType::Call, 100.0, 1.0))
        .unwrap()
        .value;

    let low = BlackScholes::new(SPOT, 0.03, 0.0, VOL)
        .unwrap()
        .price(OptionType::Call, 100.0, 1.0);
    let high = BlackScholes::new(SPOT, 0.07, 0.0, VOL)
        .unwrap()
        .price(OptionType::Call, 100.0, 1.0);
    assert!(value > low - 0.05 && value < high + 0.05);
}

// ------------------------------------------------------------------
// Exercise styles
// ------------------------------------------------------------------

#[test]
fn american_put_dominates_european_and_intrinsic() {
    let strike = 110.0;
    let engine = bs_engine(100, 201);

    let european_value = engine
        .price(&european(OptionType::Put, strike, 1.0))
        .unwrap()
        .value;

    let american = VanillaOption::new(
        VanillaPayoff::new(OptionType::Put, strike).unwrap(),
        Exercise::american(1.0).unwrap(),
    )
    .unwrap();
    let american_value = engine.price(&american).unwrap().value;

    assert!(american_value >= european_value - 1e-10);
    assert!(american_value >= strike - SPOT, "below intrinsic");
}

#[test]
fn bermudan_value_between_european_and_american() {
    let strike = 110.0;
    let engine = bs_engine(100, 201);

    let e = engine
        .price(&european(OptionType::Put, strike, 1.0))
        .unwrap()
        .value;
    let b = engine
        .price(
            &VanillaOption::new(
                VanillaPayoff::new(OptionType::Put, strike).unwrap(),
                Exercise::bermudan(vec![0.25, 0.5, 0.75, 1.0]).unwrap(),
            )
            .unwrap(),
        )
        .unwrap()
        .value;
    let a = engine
        .price(
            &VanillaOption::new(
                VanillaPayoff::new(OptionType::Put, strike).unwrap(),
                Exercise::american(1.0).unwrap(),
            )
            .unwrap(),
        )
        .unwrap()
        .value;

    assert!(e <= b + 1e-6, "european {} vs bermudan {}", e, b);
    assert!(b <= a + 1e-6, "bermudan {} vs american {}", b, a);
}

// ------------------------------------------------------------------
// Dividends
// ------------------------------------------------------------------

#[test]
fn zero_dividend_is_an_identity() {
    let option = european(OptionType::Call, 100.0, 1.0);
    let plain = bs_engine(50, 101).price(&option).unwrap();
    let with_zero_div = bs_engine(50, 101)
        .with_dividends(vec![(0.5, 0.0)])
        .price(&option)
        .unwrap();
    assert!((plain.value - with_zero_div.value).abs() < 1e-12);
}

#[test]
fn cash_dividend_lowers_call_and_raises_put() {
    let call = european(OptionType::Call, 100.0, 1.0);
    let put = european(OptionType::Put, 100.0, 1.0);

    let plain_call = bs_engine(50, 201).price(&call).unwrap().value;
    let plain_put = bs_engine(50, 201).price(&put).unwrap().value;

    let div = vec![(0.5, 5.0)];
    let div_call = bs_engine(50, 201)
        .with_dividends(div.clone())
        .price(&call)
        .unwrap()
        .value;
    let div_put = bs_engine(50, 201)
        .with_dividends(div)
        .price(&put)
        .unwrap()
        .value;

    assert!(div_call < plain_call);
    assert!(div_put > plain_put);
}

// ------------------------------------------------------------------
// Symmetry and parity
// ------------------------------------------------------------------

#[test]
fn driftless_at_the_money_call_put_symmetry() {
    // with r = q = 0 and strike at spot, mirrored payoffs price equal
    let params = BlackScholesParams::new(SPOT, VOL).unwrap();
    let engine =
        FdBlackScholesVanillaEngine::new(params, FlatCurve::new(0.0), FlatCurve::new(0.0))
            .with_grid(50, 201);

    let call = engine
        .price(&european(OptionType::Call, SPOT, 1.0))
        .unwrap()
        .value;
    let put = engine
        .price(&european(OptionType::Put, SPOT, 1.0))
        .unwrap()
        .value;
    assert_relative_eq!(call, put, max_relative = 5e-3);
}

#[test]
fn cev_engine_put_call_parity() {
    // the CEV forward is a martingale, so C - P = df * (f0 - K)
    let params = CevParams::new(100.0, 0.2, 0.5).unwrap();
    let df = FlatCurve::new(RATE).discount(1.0);

    for &strike in &[80.0, 100.0, 120.0] {
        let engine = FdCevVanillaEngine::new(params, FlatCurve::new(RATE))
            .with_grid(50, 401)
            .with_damping_steps(1);
        let call = engine.price(&european(OptionType::Call, strike, 1.0)).unwrap();
        let put = engine.price(&european(OptionType::Put, strike, 1.0)).unwrap();
        let parity = call.value - put.value - df * (100.0 - strike);
        assert!(
            parity.abs() < 0.05,
            "parity violation {} at strike {}",
            parity,
            strike
        );
    }
}

#[test]
fn cev_reference_scenario() {
    // f0 = 100, alpha = 0.2, beta = 0.5, flat 5%, 1Y: the at-the-money
    // forward call is worth ~0.759 (lognormal-equivalent volatility
    // alpha * f0^(beta-1) = 2%, and the smile correction at the money
    // is negligible at this maturity)
    let params = CevParams::new(100.0, 0.2, 0.5).unwrap();
    let engine = FdCevVanillaEngine::new(params, FlatCurve::new(RATE))
        .with_grid(100, 201)
        .with_damping_steps(0);

    let call = engine.price(&european(OptionType::Call, 100.0, 1.0)).unwrap();
    let put = engine.price(&european(OptionType::Put, 100.0, 1.0)).unwrap();

    assert!(
        call.value > 0.70 && call.value < 0.82,
        "call value {} outside reference band",
        call.value
    );
    // at the money forward, call and put are worth the same
    assert!(
        (call.value - put.value).abs() < 0.02,
        "parity violation: call {} put {}",
        call.value,
        put.value
    );
}

#[test]
fn sabr_engine_put_call_parity() {
    let params = SabrParams::new(100.0, 0.2, 0.5, 0.4, -0.3).unwrap();
    let df = FlatCurve::new(RATE).discount(1.0);

    let engine = FdSabrVanillaEngine::new(params, FlatCurve::new(RATE))
        .with_grid(25, 201, 25);
    let call = engine.price(&european(OptionType::Call, 100.0, 1.0)).unwrap();
    let put = engine.price(&european(OptionType::Put, 100.0, 1.0)).unwrap();
    let parity = call.value - put.value;
    assert!(
        parity.abs() < 0.1,
        "at-the-money parity violation {} (df {})",
        parity,
        df
    );
}

// ------------------------------------------------------------------
// Heston
// ------------------------------------------------------------------

#[test]
fn heston_small_vol_of_vol_approaches_black_scholes() {
    // with v0 = theta and sigma -> 0 the variance never leaves its
    // initial level and the model degenerates to Black-Scholes
    let params = HestonParams::new(SPOT, VOL * VOL, VOL * VOL, 1.0, 0.01, 0.0).unwrap();
    let engine =
        FdHestonVanillaEngine::new(params, FlatCurve::new(RATE), FlatCurve::new(0.0))
            .with_grid(50, 101, 31);

    let fd = engine
        .price(&european(OptionType::Call, 100.0, 1.0))
        .unwrap();
    let exact = BlackScholes::new(SPOT, RATE, 0.0, VOL)
        .unwrap()
        .price(OptionType::Call, 100.0, 1.0);

    assert!(
        (fd.value - exact).abs() < 0.05,
        "heston {} vs black-scholes {}",
        fd.value,
        exact
    );
    assert!(fd.delta > 0.0 && fd.delta < 1.0);
    assert!(fd.gamma > 0.0);
}

#[test]
fn heston_multi_strike_cache_matches_direct_solve() {
    let params = HestonParams::new(SPOT, 0.04, 0.04, 1.5, 0.3, -0.7).unwrap();
    let engine =
        FdHestonVanillaEngine::new(params, FlatCurve::new(RATE), FlatCurve::new(0.0))
            .with_grid(50, 101, 31)
            .with_cached_strikes(vec![90.0, 110.0]);

    let mut cache = ResultsCache::new();
    engine
        .price_with_cache(&european(OptionType::Call, 100.0, 1.0), &mut cache)
        .unwrap();

    for &strike in &[90.0, 110.0] {
        let cached = engine
            .price_with_cache(&european(OptionType::Call, strike, 1.0), &mut cache)
            .unwrap();
        let direct = engine
            .price(&european(OptionType::Call, strike, 1.0))
            .unwrap();
        // the cached value is a rescaled read of another solve, equal
        // only up to the scheme's own discretisation error
        assert!(
            (cached.value - direct.value).abs() < 0.02 * direct.value.max(1.0),
            "strike {}: cached {} vs direct {}",
            strike,
            cached.value,
            direct.value
        );
    }
}

// ------------------------------------------------------------------
// Reproducibility
// ------------------------------------------------------------------

#[test]
fn repeated_solves_are_bit_identical() {
    let option = european(OptionType::Call, 105.0, 1.0);
    let a = bs_engine(50, 101).price(&option).unwrap();
    let b = bs_engine(50, 101).price(&option).unwrap();
    assert_eq!(a, b);

    let params = HestonParams::new(SPOT, 0.04, 0.04, 1.5, 0.3, -0.7).unwrap();
    let heston = |_: ()| {
        FdHestonVanillaEngine::new(params, FlatCurve::new(RATE), FlatCurve::new(0.0))
            .with_grid(20, 41, 21)
            .price(&option)
            .unwrap()
    };
    assert_eq!(heston(()), heston(()));
}

// ------------------------------------------------------------------
// Configuration errors
// ------------------------------------------------------------------

#[test]
fn configuration_errors_fail_fast() {
    // model domain errors at parameter construction
    assert!(CevParams::new(100.0, 0.2, 1.2).is_err());
    assert!(HestonParams::new(100.0, 0.04, 0.04, 1.5, 0.3, 2.0).is_err());
    assert!(VanillaPayoff::new(OptionType::Call, -10.0).is_err());

    // a grid too small for result interpolation is rejected before any
    // stepping happens
    let engine = bs_engine(10, 3);
    assert!(engine.price(&european(OptionType::Call, 100.0, 1.0)).is_err());

    // multi-strike caching combined with discrete dividends
    let params = HestonParams::new(SPOT, 0.04, 0.04, 1.5, 0.3, -0.7).unwrap();
    let engine =
        FdHestonVanillaEngine::new(params, FlatCurve::new(RATE), FlatCurve::new(0.0))
            .with_cached_strikes(vec![90.0])
            .with_dividends(vec![(0.5, 1.0)]);
    assert!(engine.price(&european(OptionType::Call, 100.0, 1.0)).is_err());
}
