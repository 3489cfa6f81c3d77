//! # fdm_core: Generic Finite-Difference Machinery
//!
//! Building blocks for pricing PDEs with Alternating-Direction-Implicit
//! (ADI) schemes:
//!
//! - Grid construction: 1-D meshers with hyperbolic concentration and
//!   their multi-dimensional Cartesian composite (`mesher`)
//! - Discretised spatial operators: per-direction tri-diagonal maps and
//!   the 9-point mixed-derivative stencil (`operator`)
//! - Boundary conditions: Dirichlet, time-dependent and discounted
//!   variants (`boundary`)
//! - Step conditions: early exercise, discrete dividends, snapshots
//!   (`conditions`)
//! - Inner-value calculators translating payoffs into grid arrays
//!   (`inner_value`)
//! - Operator-splitting schemes and the backward time-marching solvers
//!   (`solver`)
//!
//! The crate is deliberately model-agnostic: concrete PDE coefficients
//! enter through the [`operator::LinearOpComposite`] trait, payoffs
//! through plain functions, and discounting through the
//! [`market_data::YieldCurve`] trait. Model-specific operators, meshers
//! and engines live in the `fdm_models` and `fdm_pricing` crates.
//!
//! ## Conventions
//!
//! - Time is a year fraction from the evaluation date; backward sweeps
//!   run from maturity down to zero. Calendar and day-count arithmetic
//!   are the caller's concern.
//! - Grids are flat `Vec<f64>` arrays addressed through a row-major
//!   [`layout::OpLayout`] (dimension 0 varies fastest).
//! - Configuration errors are reported eagerly at construction through
//!   [`error::FdmError`]; the sweep itself has no recoverable error path
//!   and non-finite values surface at result interpolation.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod boundary;
pub mod conditions;
pub mod error;
pub mod inner_value;
pub mod layout;
pub mod market_data;
pub mod math;
pub mod mesher;
pub mod operator;
pub mod solver;
