//! Market data consumed by the finite-difference core.
//!
//! Only discounting enters the core directly: operators derive their
//! short-rate coefficients from a yield curve, and discount-Dirichlet
//! boundaries roll a terminal cash flow back through one. Everything
//! else (calendars, quotes, surfaces) is the caller's concern.

pub mod curves;

pub use curves::{FlatCurve, InterpolatedZeroCurve, YieldCurve};
