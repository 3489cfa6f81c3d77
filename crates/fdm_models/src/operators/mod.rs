//! Model-specific spatial operators.
//!
//! Each operator discretises one model's backward Kolmogorov generator
//! on a mesher and implements
//! [`fdm_core::operator::LinearOpComposite`]. The banded structure is
//! assembled once at construction; `set_time` re-derives only the
//! rate-dependent coefficients for the current interval.

mod black_scholes;
mod cev;
mod heston;
mod sabr;

pub use black_scholes::BlackScholesOp;
pub use cev::CevOp;
pub use heston::HestonOp;
pub use sabr::SabrOp;
