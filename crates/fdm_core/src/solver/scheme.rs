//! Operator-splitting scheme descriptors.

/// The splitting scheme family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemeKind {
    /// Douglas splitting: one explicit pass, per-direction implicit
    /// corrections.
    Douglas,
    /// Craig-Sneyd: Douglas plus a mixed-derivative corrector pass.
    CraigSneyd,
    /// Modified Craig-Sneyd: corrector over the mixed and the full
    /// operator.
    ModifiedCraigSneyd,
    /// Hundsdorfer-Verwer: corrector pass re-centered on the predictor.
    Hundsdorfer,
    /// One-step backward Euler. More dissipative; used for damping.
    ImplicitEuler,
}

/// A splitting scheme with its weights, chosen once at solver
/// construction and fixed for the whole sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemeDesc {
    /// Scheme family.
    pub kind: SchemeKind,
    /// Implicitness weight of the per-direction solves.
    pub theta: f64,
    /// Corrector weight (Craig-Sneyd family and Hundsdorfer).
    pub mu: f64,
}

impl SchemeDesc {
    /// Douglas scheme, `theta = 1/2`.
    pub fn douglas() -> Self {
        Self {
            kind: SchemeKind::Douglas,
            theta: 0.5,
            mu: 0.0,
        }
    }

    /// Craig-Sneyd scheme, `theta = 1/2`, `mu = 1/2`.
    pub fn craig_sneyd() -> Self {
        Self {
            kind: SchemeKind::CraigSneyd,
            theta: 0.5,
            mu: 0.5,
        }
    }

    /// Modified Craig-Sneyd scheme, `theta = mu = 1/3`.
    pub fn modified_craig_sneyd() -> Self {
        Self {
            kind: SchemeKind::ModifiedCraigSneyd,
            theta: 1.0 / 3.0,
            mu: 1.0 / 3.0,
        }
    }

    /// Hundsdorfer-Verwer scheme, `theta = 1/2 + sqrt(3)/6`, `mu = 1/2`.
    pub fn hundsdorfer() -> Self {
        Self {
            kind: SchemeKind::Hundsdorfer,
            theta: 0.5 + 3.0_f64.sqrt() / 6.0,
            mu: 0.5,
        }
    }

    /// Fully implicit one-step scheme.
    pub fn implicit_euler() -> Self {
        Self {
            kind: SchemeKind::ImplicitEuler,
            theta: 1.0,
            mu: 0.0,
        }
    }
}

impl Default for SchemeDesc {
    /// Douglas is the conservative general-purpose default.
    fn default() -> Self {
        Self::douglas()
    }
}
