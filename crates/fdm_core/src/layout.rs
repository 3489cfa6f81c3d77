//! Row-major mapping between multi-indices and linear grid indices.

use crate::error::FdmError;

/// Immutable layout of a multi-dimensional grid.
///
/// Dimension 0 varies fastest: `index = sum_d coord[d] * spacing[d]`
/// with `spacing[0] = 1` and `spacing[d] = spacing[d-1] * dims[d-1]`.
/// The layout is fixed at mesher construction and never changes for the
/// lifetime of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpLayout {
    dims: Vec<usize>,
    spacing: Vec<usize>,
    size: usize,
}

impl OpLayout {
    /// Build a layout from per-dimension point counts.
    ///
    /// Every dimension needs at least 2 points.
    pub fn new(dims: Vec<usize>) -> Result<Self, FdmError> {
        if dims.is_empty() {
            return Err(FdmError::InvalidConfiguration(
                "layout needs at least one dimension".to_string(),
            ));
        }
        if let Some(&d) = dims.iter().find(|&&d| d < 2) {
            return Err(FdmError::InvalidConfiguration(format!(
                "every grid dimension needs at least 2 points, got {}",
                d
            )));
        }

        let mut spacing = Vec::with_capacity(dims.len());
        let mut stride = 1usize;
        for &d in &dims {
            spacing.push(stride);
            stride *= d;
        }

        Ok(Self {
            dims,
            spacing,
            size: stride,
        })
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dims.len()
    }

    /// Per-dimension point counts.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Per-dimension strides.
    #[inline]
    pub fn spacing(&self) -> &[usize] {
        &self.spacing
    }

    /// Total number of grid points.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Linear index of a multi-index.
    #[inline]
    pub fn index(&self, coords: &[usize]) -> usize {
        debug_assert_eq!(coords.len(), self.dims.len());
        coords
            .iter()
            .zip(&self.spacing)
            .map(|(c, s)| c * s)
            .sum()
    }

    /// Coordinate of a linear index along one dimension.
    #[inline]
    pub fn coord(&self, index: usize, direction: usize) -> usize {
        (index / self.spacing[direction]) % self.dims[direction]
    }

    /// Full multi-index of a linear index.
    pub fn coords(&self, index: usize) -> Vec<usize> {
        (0..self.dims.len()).map(|d| self.coord(index, d)).collect()
    }

    /// Neighbouring linear index offset by `offset` steps along
    /// `direction`. The caller guarantees the neighbour exists.
    #[inline]
    pub fn neighbour(&self, index: usize, direction: usize, offset: isize) -> usize {
        (index as isize + offset * self.spacing[direction] as isize) as usize
    }
}
