//! # fdm_models: Models and Payoffs for the Finite-Difference Core
//!
//! This crate supplies everything model-specific the generic machinery
//! in `fdm_core` is parameterised over:
//!
//! - Payoff and exercise definitions (`payoff`, `exercise`)
//! - Validated model parameter sets for Black-Scholes, CEV, Heston and
//!   SABR dynamics (`models`)
//! - The discretised spatial operators implementing
//!   [`fdm_core::operator::LinearOpComposite`] for each model
//!   (`operators`)
//! - The model-specific grid builders (`meshers`)
//! - A closed-form Black-Scholes reference used by validation tests
//!   (`analytical`)
//!
//! Parameter sets validate eagerly: a model that constructs is ready to
//! price, and every invalid input is reported as a
//! [`error::ModelError`] before any grid is built.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod analytical;
pub mod error;
pub mod exercise;
pub mod instrument;
pub mod meshers;
pub mod models;
pub mod operators;
pub mod payoff;
