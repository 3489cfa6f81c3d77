//! Pricing result type.

/// Value and sensitivities at the evaluation point.
///
/// Delta and gamma differentiate along the spot/forward axis of the
/// solved surface; theta is a calendar-time derivative obtained by
/// differencing against a snapshot taken one small time step away.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResults {
    /// Present value.
    pub value: f64,
    /// dV/dS.
    pub delta: f64,
    /// d2V/dS2.
    pub gamma: f64,
    /// dV/dt in calendar time.
    pub theta: f64,
}
