//! Model-specific grid builders.
//!
//! Each builder turns a parameter set into a 1-D [`fdm_core::mesher::Mesher1d`]
//! whose truncation range covers the model's terminal distribution up to
//! a tail probability `eps` and whose points concentrate where the
//! payoff has curvature.

mod black_scholes;
mod cev;
mod variance;

pub use black_scholes::black_scholes_mesher;
pub use cev::cev_mesher;
pub use variance::{heston_variance_mesher, VarianceMesher};
