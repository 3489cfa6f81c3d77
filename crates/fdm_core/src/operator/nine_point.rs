//! Nine-point stencil for mixed second derivatives.

use super::triple_band::first_derivative_weights;
use crate::layout::OpLayout;
use crate::mesher::MesherComposite;

/// Mixed-derivative operator `d^2/(dx_{d0} dx_{d1})` as the tensor
/// product of the two directions' first-derivative stencils.
///
/// Nine coefficients per grid point cover the four diagonal neighbours a
/// correlation term couples. Edge rows reuse the one-sided
/// first-derivative weights, so the stencil narrows there instead of
/// reaching outside the grid. Splitting schemes always apply this
/// operator explicitly.
#[derive(Debug, Clone)]
pub struct NinePointLinearOp {
    d0: usize,
    d1: usize,
    layout: OpLayout,
    // stencil[3*k + l] is the weight of the neighbour offset by
    // (k-1) along d0 and (l-1) along d1
    stencil: Vec<Vec<f64>>,
}

impl NinePointLinearOp {
    /// Second-order mixed derivative between `d0` and `d1`.
    pub fn second_order_mixed_derivative(
        d0: usize,
        d1: usize,
        mesher: &MesherComposite,
    ) -> Self {
        debug_assert_ne!(d0, d1);
        let size = mesher.size();
        let mut stencil: Vec<Vec<f64>> = (0..9).map(|_| vec![0.0; size]).collect();

        for i in 0..size {
            let w0 = first_derivative_weights(mesher, i, d0);
            let w1 = first_derivative_weights(mesher, i, d1);
            for (k, w0k) in w0.iter().enumerate() {
                for (l, w1l) in w1.iter().enumerate() {
                    stencil[3 * k + l][i] = w0k * w1l;
                }
            }
        }

        Self {
            d0,
            d1,
            layout: mesher.layout().clone(),
            stencil,
        }
    }

    /// Row-wise scaling by `u` (the per-point correlation coefficient).
    pub fn mult(&self, u: &[f64]) -> Self {
        debug_assert_eq!(u.len(), self.layout.size());
        let mut out = self.clone();
        for band in &mut out.stencil {
            for (w, ui) in band.iter_mut().zip(u) {
                *w *= ui;
            }
        }
        out
    }

    /// Apply the operator: `y = A x`.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.layout.size());
        let s0 = self.layout.spacing()[self.d0] as isize;
        let s1 = self.layout.spacing()[self.d1] as isize;

        let mut y = vec![0.0; x.len()];
        for i in 0..x.len() {
            let mut v = 0.0;
            for k in 0..3usize {
                for l in 0..3usize {
                    let w = self.stencil[3 * k + l][i];
                    if w == 0.0 {
                        continue;
                    }
                    let j = (i as isize + (k as isize - 1) * s0 + (l as isize - 1) * s1)
                        as usize;
                    v += w * x[j];
                }
            }
            y[i] = v;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::Mesher1d;

    fn grid() -> MesherComposite {
        let m0 = Mesher1d::uniform(0.0, 1.0, 9).unwrap();
        let m1 = Mesher1d::concentrating(0.0, 2.0, 11, (1.0, 0.3)).unwrap();
        MesherComposite::new_2d(m0, m1).unwrap()
    }

    #[test]
    fn test_mixed_derivative_of_product_function() {
        // f(x, y) = x * y has d2f/dxdy = 1 everywhere.
        let mesher = grid();
        let op = NinePointLinearOp::second_order_mixed_derivative(0, 1, &mesher);
        let f: Vec<f64> = (0..mesher.size())
            .map(|i| mesher.location(i, 0) * mesher.location(i, 1))
            .collect();
        let y = op.apply(&f);
        for (i, v) in y.iter().enumerate() {
            assert!((v - 1.0).abs() < 1e-9, "point {}: {}", i, v);
        }
    }

    #[test]
    fn test_separable_function_has_zero_mixed_term() {
        // f(x, y) = x^2 + y^2 has no cross derivative.
        let mesher = grid();
        let op = NinePointLinearOp::second_order_mixed_derivative(0, 1, &mesher);
        let f: Vec<f64> = (0..mesher.size())
            .map(|i| {
                let x = mesher.location(i, 0);
                let y = mesher.location(i, 1);
                x * x + y * y
            })
            .collect();
        let y = op.apply(&f);
        for (i, v) in y.iter().enumerate() {
            assert!(v.abs() < 1e-8, "point {}: {}", i, v);
        }
    }

    #[test]
    fn test_mult_scales_rows() {
        let mesher = grid();
        let op = NinePointLinearOp::second_order_mixed_derivative(0, 1, &mesher);
        let f: Vec<f64> = (0..mesher.size())
            .map(|i| mesher.location(i, 0) * mesher.location(i, 1))
            .collect();
        let scaled = op.mult(&vec![2.5; mesher.size()]);
        let y = scaled.apply(&f);
        for v in &y {
            assert!((v - 2.5).abs() < 1e-8);
        }
    }
}
