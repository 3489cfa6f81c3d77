//! Grid coordinate construction.
//!
//! A [`Mesher1d`] owns one strictly increasing coordinate sequence plus
//! its forward/backward spacings; a [`MesherComposite`] combines several
//! of them into the Cartesian-product grid the operators and solvers
//! work on.

mod composite;

pub use composite::MesherComposite;

use crate::error::FdmError;

/// One-dimensional coordinate sequence with cached spacings.
///
/// `dplus[i] = x[i+1] - x[i]` and `dminus[i] = x[i] - x[i-1]`; the
/// undefined entries at the ends are stored as NaN and are never read by
/// the operators (first-derivative edge rows are one-sided, second
/// derivatives vanish on the edge).
#[derive(Debug, Clone)]
pub struct Mesher1d {
    locations: Vec<f64>,
    dplus: Vec<f64>,
    dminus: Vec<f64>,
}

impl Mesher1d {
    /// Build a mesher from explicit coordinates.
    ///
    /// Fails unless there are at least 2 strictly increasing, finite
    /// locations.
    pub fn from_locations(locations: Vec<f64>) -> Result<Self, FdmError> {
        if locations.len() < 2 {
            return Err(FdmError::InvalidMesher(format!(
                "need at least 2 grid points, got {}",
                locations.len()
            )));
        }
        if locations.iter().any(|x| !x.is_finite()) {
            return Err(FdmError::InvalidMesher(
                "grid coordinates must be finite".to_string(),
            ));
        }
        if locations.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FdmError::InvalidMesher(
                "grid coordinates must be strictly increasing".to_string(),
            ));
        }

        let n = locations.len();
        let mut dplus = vec![f64::NAN; n];
        let mut dminus = vec![f64::NAN; n];
        for i in 0..n - 1 {
            dplus[i] = locations[i + 1] - locations[i];
            dminus[i + 1] = dplus[i];
        }

        Ok(Self {
            locations,
            dplus,
            dminus,
        })
    }

    /// Equidistant mesher over `[start, end]`.
    pub fn uniform(start: f64, end: f64, size: usize) -> Result<Self, FdmError> {
        if size < 2 {
            return Err(FdmError::InvalidMesher(format!(
                "need at least 2 grid points, got {}",
                size
            )));
        }
        if !(end > start) {
            return Err(FdmError::InvalidMesher(format!(
                "upper bound {} must exceed lower bound {}",
                end, start
            )));
        }
        let h = (end - start) / (size - 1) as f64;
        let mut locations: Vec<f64> = (0..size).map(|i| start + h * i as f64).collect();
        locations[size - 1] = end;
        Self::from_locations(locations)
    }

    /// Mesher over `[start, end]` with hyperbolic-sine concentration of
    /// points around `point`.
    ///
    /// `density` is a fraction of the interval width: smaller values
    /// cluster the grid more tightly around the pivot. The pivot must
    /// lie inside `[start, end]`.
    pub fn concentrating(
        start: f64,
        end: f64,
        size: usize,
        concentration: (f64, f64),
    ) -> Result<Self, FdmError> {
        let (point, density) = concentration;
        if size < 2 {
            return Err(FdmError::InvalidMesher(format!(
                "need at least 2 grid points, got {}",
                size
            )));
        }
        if !(end > start) {
            return Err(FdmError::InvalidMesher(format!(
                "upper bound {} must exceed lower bound {}",
                end, start
            )));
        }
        if !(density > 0.0) || !density.is_finite() {
            return Err(FdmError::InvalidMesher(format!(
                "concentration density must be positive, got {}",
                density
            )));
        }
        if point < start || point > end {
            return Err(FdmError::InvalidMesher(format!(
                "concentration point {} outside grid bounds [{}, {}]",
                point, start, end
            )));
        }

        // Tavella-Randall transformation: uniform in u, sinh in x.
        let d = density * (end - start);
        let c1 = ((start - point) / d).asinh();
        let c2 = ((end - point) / d).asinh();

        let n = size - 1;
        let mut locations: Vec<f64> = (0..size)
            .map(|i| {
                let u = i as f64 / n as f64;
                point + d * (c1 * (1.0 - u) + c2 * u).sinh()
            })
            .collect();
        // pin the ends against transform roundoff
        locations[0] = start;
        locations[n] = end;

        Self::from_locations(locations)
    }

    /// Number of points.
    #[inline]
    pub fn size(&self) -> usize {
        self.locations.len()
    }

    /// All coordinates.
    #[inline]
    pub fn locations(&self) -> &[f64] {
        &self.locations
    }

    /// Coordinate at `i`.
    #[inline]
    pub fn location(&self, i: usize) -> f64 {
        self.locations[i]
    }

    /// Forward spacing at `i` (NaN at the upper edge).
    #[inline]
    pub fn dplus(&self, i: usize) -> f64 {
        self.dplus[i]
    }

    /// Backward spacing at `i` (NaN at the lower edge).
    #[inline]
    pub fn dminus(&self, i: usize) -> f64 {
        self.dminus[i]
    }
}
