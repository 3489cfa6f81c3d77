//! Payoff-to-grid translation.
//!
//! An inner-value calculator maps grid coordinates to the payoff's
//! intrinsic value. It seeds the terminal condition and supplies the
//! floor for early-exercise projections. The payoff itself is an opaque
//! pure function of the spatial coordinate, per the core's external
//! interface contract.

use crate::math::simpson;
use crate::mesher::MesherComposite;

/// Sub-intervals used when Simpson-averaging a cell containing the
/// payoff kink.
const CELL_AVG_INTERVALS: usize = 16;

/// Maps payoff and grid coordinates to intrinsic values.
pub trait InnerValueCalculator {
    /// Intrinsic value at the grid point `index`.
    fn inner_value(&self, mesher: &MesherComposite, index: usize, t: f64) -> f64;

    /// Cell-averaged intrinsic value at the grid point `index`.
    ///
    /// Averaging tames the terminal kink: the cell containing the
    /// payoff's non-smooth point contributes its mean payoff rather
    /// than a point sample.
    fn avg_inner_value(&self, mesher: &MesherComposite, index: usize, t: f64) -> f64;
}

/// Coordinate transform between the mesher axis and the payoff
/// argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateTransform {
    /// The mesher coordinate is the payoff argument.
    Identity,
    /// The mesher works in logs; the payoff argument is `exp(x)`.
    Exp,
}

impl CoordinateTransform {
    #[inline]
    fn map(&self, x: f64) -> f64 {
        match self {
            CoordinateTransform::Identity => x,
            CoordinateTransform::Exp => x.exp(),
        }
    }
}

/// Cell-averaging inner-value calculator along one payoff direction.
///
/// Cells away from the payoff kink are evaluated pointwise; the cell
/// straddling the kink is Simpson-averaged. With no kink supplied every
/// cell is evaluated pointwise.
pub struct CellAveragingInnerValue {
    payoff: Box<dyn Fn(f64) -> f64>,
    direction: usize,
    transform: CoordinateTransform,
    kink: Option<f64>,
}

impl CellAveragingInnerValue {
    /// Calculator on an untransformed coordinate axis.
    pub fn new(
        payoff: Box<dyn Fn(f64) -> f64>,
        direction: usize,
        kink: Option<f64>,
    ) -> Self {
        Self {
            payoff,
            direction,
            transform: CoordinateTransform::Identity,
            kink,
        }
    }

    /// Calculator on a log coordinate axis (payoff evaluated at
    /// `exp(x)`).
    pub fn new_log(
        payoff: Box<dyn Fn(f64) -> f64>,
        direction: usize,
        kink: Option<f64>,
    ) -> Self {
        Self {
            payoff,
            direction,
            transform: CoordinateTransform::Exp,
            kink,
        }
    }

    /// The coordinate cell around grid point `index`: from the midpoint
    /// towards the left neighbour to the midpoint towards the right
    /// neighbour, half-cells on the edges.
    fn cell(&self, mesher: &MesherComposite, index: usize) -> (f64, f64) {
        let layout = mesher.layout();
        let coord = layout.coord(index, self.direction);
        let last = layout.dims()[self.direction] - 1;
        let x = mesher.location(index, self.direction);

        let a = if coord == 0 {
            x
        } else {
            x - 0.5 * mesher.dminus(index, self.direction)
        };
        let b = if coord == last {
            x
        } else {
            x + 0.5 * mesher.dplus(index, self.direction)
        };
        (a, b)
    }
}

impl InnerValueCalculator for CellAveragingInnerValue {
    fn inner_value(&self, mesher: &MesherComposite, index: usize, _t: f64) -> f64 {
        let s = self.transform.map(mesher.location(index, self.direction));
        (self.payoff)(s)
    }

    fn avg_inner_value(&self, mesher: &MesherComposite, index: usize, t: f64) -> f64 {
        let Some(kink) = self.kink else {
            return self.inner_value(mesher, index, t);
        };

        let (a, b) = self.cell(mesher, index);
        if a == b {
            return self.inner_value(mesher, index, t);
        }

        // the kink lives in payoff space; the transform is monotone
        let (lo, hi) = (self.transform.map(a), self.transform.map(b));
        if kink <= lo || kink >= hi {
            return self.inner_value(mesher, index, t);
        }

        let payoff = &self.payoff;
        let transform = self.transform;
        simpson(
            |x| (payoff)(transform.map(x)),
            a,
            b,
            CELL_AVG_INTERVALS,
        ) / (b - a)
    }
}

impl std::fmt::Debug for CellAveragingInnerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellAveragingInnerValue")
            .field("direction", &self.direction)
            .field("transform", &self.transform)
            .field("kink", &self.kink)
            .finish()
    }
}
