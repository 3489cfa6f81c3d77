//! Validated model parameter sets.
//!
//! Each set is an immutable value object: construction validates every
//! parameter against its domain and an instance that exists is ready to
//! drive a mesher and an operator.

mod black_scholes;
mod cev;
mod heston;
mod sabr;

pub use black_scholes::BlackScholesParams;
pub use cev::CevParams;
pub use heston::HestonParams;
pub use sabr::SabrParams;
