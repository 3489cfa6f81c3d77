//! Cartesian composition of 1-D meshers.

use super::Mesher1d;
use crate::error::FdmError;
use crate::layout::OpLayout;

/// Multi-dimensional grid built as the Cartesian product of independent
/// 1-D meshers, with a canonical row-major layout (dimension 0 fastest).
///
/// Immutable once built; the layout, point counts and coordinates never
/// change for the lifetime of a solve.
#[derive(Debug, Clone)]
pub struct MesherComposite {
    meshers: Vec<Mesher1d>,
    layout: OpLayout,
}

impl MesherComposite {
    /// Compose N meshers into an N-dimensional grid.
    pub fn new(meshers: Vec<Mesher1d>) -> Result<Self, FdmError> {
        if meshers.is_empty() {
            return Err(FdmError::InvalidMesher(
                "composite needs at least one mesher".to_string(),
            ));
        }
        let layout = OpLayout::new(meshers.iter().map(Mesher1d::size).collect())?;
        Ok(Self { meshers, layout })
    }

    /// One-dimensional composite.
    pub fn from_single(mesher: Mesher1d) -> Result<Self, FdmError> {
        Self::new(vec![mesher])
    }

    /// Two-dimensional composite.
    pub fn new_2d(m0: Mesher1d, m1: Mesher1d) -> Result<Self, FdmError> {
        Self::new(vec![m0, m1])
    }

    /// The index layout.
    #[inline]
    pub fn layout(&self) -> &OpLayout {
        &self.layout
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.meshers.len()
    }

    /// Total number of grid points.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Coordinate of linear `index` along `direction`.
    #[inline]
    pub fn location(&self, index: usize, direction: usize) -> f64 {
        self.meshers[direction].location(self.layout.coord(index, direction))
    }

    /// Forward spacing at linear `index` along `direction`.
    #[inline]
    pub fn dplus(&self, index: usize, direction: usize) -> f64 {
        self.meshers[direction].dplus(self.layout.coord(index, direction))
    }

    /// Backward spacing at linear `index` along `direction`.
    #[inline]
    pub fn dminus(&self, index: usize, direction: usize) -> f64 {
        self.meshers[direction].dminus(self.layout.coord(index, direction))
    }

    /// The 1-D coordinate axis of `direction`.
    #[inline]
    pub fn locations(&self, direction: usize) -> &[f64] {
        self.meshers[direction].locations()
    }
}
