//! Pricing-layer error type.

use fdm_core::error::FdmError;
use fdm_models::error::ModelError;
use thiserror::Error;

/// Errors surfaced by the pricing engines.
///
/// Configuration problems fail before any numerical work starts; a
/// sweep that runs to completion either produces a full result set or a
/// [`FdmError`] from the final interpolation — there is no partial
/// result and no silent fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Invalid engine input or an unsupported combination of inputs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Model parameter validation failure.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failure inside the finite-difference core.
    #[error(transparent)]
    Fdm(#[from] FdmError),
}
