//! # fdm_pricing: Vanilla ADI Finite-Difference Engines
//!
//! Pricing engines composing the `fdm_core` machinery with the
//! `fdm_models` operators and meshers:
//!
//! - [`engines::FdBlackScholesVanillaEngine`] — 1-D log-spot grid,
//!   discrete dividends, every exercise style
//! - [`engines::FdCevVanillaEngine`] — 1-D forward grid with an
//!   absorbing origin and an injectable upper boundary pricer
//! - [`engines::FdHestonVanillaEngine`] — 2-D log-spot x variance grid
//!   with optional multiple-strike result caching
//! - [`engines::FdSabrVanillaEngine`] — 2-D forward x log-volatility
//!   grid
//!
//! One pricing call is strictly sequential; parallelism is offered only
//! across independent calls through [`batch::price_all`]. The
//! multiple-strike [`cache::ResultsCache`] is deliberately not
//! thread-safe and must be owned by one caller at a time.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod batch;
pub mod cache;
pub mod engines;
pub mod error;
pub mod results;

pub use engines::VanillaEngine;
pub use results::PricingResults;
