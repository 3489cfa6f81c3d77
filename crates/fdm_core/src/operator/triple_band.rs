//! Per-direction tri-diagonal operators on a multi-dimensional grid.

use crate::layout::OpLayout;
use crate::mesher::MesherComposite;

/// Central first-derivative stencil weights `[lower, diag, upper]` at a
/// grid point, one-sided on the edges.
pub(crate) fn first_derivative_weights(
    mesher: &MesherComposite,
    index: usize,
    direction: usize,
) -> [f64; 3] {
    let layout = mesher.layout();
    let coord = layout.coord(index, direction);
    let last = layout.dims()[direction] - 1;

    if coord == 0 {
        let hp = mesher.dplus(index, direction);
        [0.0, -1.0 / hp, 1.0 / hp]
    } else if coord == last {
        let hm = mesher.dminus(index, direction);
        [-1.0 / hm, 1.0 / hm, 0.0]
    } else {
        let hm = mesher.dminus(index, direction);
        let hp = mesher.dplus(index, direction);
        [
            -hp / (hm * (hm + hp)),
            (hp - hm) / (hm * hp),
            hm / (hp * (hm + hp)),
        ]
    }
}

/// Tri-diagonal linear operator along one grid direction.
///
/// Stores one `[lower, diag, upper]` band triple per grid point; the
/// sparsity pattern never changes after construction. Model operators
/// combine these through [`mult`](Self::mult), [`add`](Self::add) and
/// [`add_to_diagonal`](Self::add_to_diagonal) each time `set_time`
/// re-derives coefficients.
#[derive(Debug, Clone)]
pub struct TripleBandLinearOp {
    direction: usize,
    layout: OpLayout,
    lower: Vec<f64>,
    diag: Vec<f64>,
    upper: Vec<f64>,
}

impl TripleBandLinearOp {
    /// Zero operator along `direction`.
    pub fn zero(direction: usize, mesher: &MesherComposite) -> Self {
        let size = mesher.size();
        Self {
            direction,
            layout: mesher.layout().clone(),
            lower: vec![0.0; size],
            diag: vec![0.0; size],
            upper: vec![0.0; size],
        }
    }

    /// First-derivative operator along `direction`: central differences
    /// on the non-uniform interior, one-sided rows at the edges.
    pub fn first_derivative(direction: usize, mesher: &MesherComposite) -> Self {
        let mut op = Self::zero(direction, mesher);
        for i in 0..mesher.size() {
            let [lo, dg, up] = first_derivative_weights(mesher, i, direction);
            op.lower[i] = lo;
            op.diag[i] = dg;
            op.upper[i] = up;
        }
        op
    }

    /// Second-derivative operator along `direction`: central differences
    /// on the non-uniform interior, zero rows at the edges.
    pub fn second_derivative(direction: usize, mesher: &MesherComposite) -> Self {
        let layout = mesher.layout();
        let last = layout.dims()[direction] - 1;
        let mut op = Self::zero(direction, mesher);
        for i in 0..mesher.size() {
            let coord = layout.coord(i, direction);
            if coord == 0 || coord == last {
                continue;
            }
            let hm = mesher.dminus(i, direction);
            let hp = mesher.dplus(i, direction);
            op.lower[i] = 2.0 / (hm * (hm + hp));
            op.diag[i] = -2.0 / (hm * hp);
            op.upper[i] = 2.0 / (hp * (hm + hp));
        }
        op
    }

    /// The direction this operator acts along.
    #[inline]
    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Row-wise scaling: each band triple at grid point `i` is
    /// multiplied by `u[i]`.
    pub fn mult(&self, u: &[f64]) -> Self {
        debug_assert_eq!(u.len(), self.diag.len());
        let mut out = self.clone();
        for i in 0..u.len() {
            out.lower[i] *= u[i];
            out.diag[i] *= u[i];
            out.upper[i] *= u[i];
        }
        out
    }

    /// Uniform scaling of the whole operator.
    pub fn scale(&self, s: f64) -> Self {
        let mut out = self.clone();
        for i in 0..out.diag.len() {
            out.lower[i] *= s;
            out.diag[i] *= s;
            out.upper[i] *= s;
        }
        out
    }

    /// Sum of two operators along the same direction.
    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.direction, other.direction);
        debug_assert_eq!(self.diag.len(), other.diag.len());
        let mut out = self.clone();
        for i in 0..out.diag.len() {
            out.lower[i] += other.lower[i];
            out.diag[i] += other.diag[i];
            out.upper[i] += other.upper[i];
        }
        out
    }

    /// Add a scalar to every diagonal entry (an identity-scaled shift).
    pub fn add_to_diagonal(mut self, s: f64) -> Self {
        for d in &mut self.diag {
            *d += s;
        }
        self
    }

    /// Apply the operator: `y = A x`.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.diag.len());
        let stride = self.layout.spacing()[self.direction];
        let last = self.layout.dims()[self.direction] - 1;

        let mut y = vec![0.0; x.len()];
        for i in 0..x.len() {
            let coord = self.layout.coord(i, self.direction);
            let mut v = self.diag[i] * x[i];
            if coord > 0 {
                v += self.lower[i] * x[i - stride];
            }
            if coord < last {
                v += self.upper[i] * x[i + stride];
            }
            y[i] = v;
        }
        y
    }

    /// Solve `(a * A + b * I) y = r` for `y` with the Thomas algorithm,
    /// line by line along the operator's direction. O(grid size).
    pub fn solve_splitting(&self, r: &[f64], a: f64, b: f64) -> Vec<f64> {
        debug_assert_eq!(r.len(), self.diag.len());
        let stride = self.layout.spacing()[self.direction];
        let n = self.layout.dims()[self.direction];

        let mut y = vec![0.0; r.len()];
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        for base in 0..r.len() {
            if self.layout.coord(base, self.direction) != 0 {
                continue;
            }

            // forward sweep
            let mut i = base;
            let mut denom = a * self.diag[i] + b;
            c_prime[0] = a * self.upper[i] / denom;
            d_prime[0] = r[i] / denom;
            for k in 1..n {
                i += stride;
                let lo = a * self.lower[i];
                denom = a * self.diag[i] + b - lo * c_prime[k - 1];
                c_prime[k] = a * self.upper[i] / denom;
                d_prime[k] = (r[i] - lo * d_prime[k - 1]) / denom;
            }

            // back substitution
            let mut value = d_prime[n - 1];
            y[base + (n - 1) * stride] = value;
            for k in (0..n - 1).rev() {
                value = d_prime[k] - c_prime[k] * value;
                y[base + k * stride] = value;
            }
        }
        y
    }
}
