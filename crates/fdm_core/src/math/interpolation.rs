//! Natural cubic spline interpolation with analytic derivatives.
//!
//! The result interpolator reads value, delta and gamma off the solved
//! grid, so the spline exposes the first and second derivative of its
//! local polynomial alongside the value.

use crate::error::InterpolationError;
use num_traits::Float;

/// Polynomial coefficients for one spline segment:
/// `y = a + b*(x-xi) + c*(x-xi)^2 + d*(x-xi)^3`.
#[derive(Debug, Clone, Copy)]
struct SegmentCoeffs<T: Float> {
    a: T,
    b: T,
    c: T,
    d: T,
}

/// Natural cubic spline with C2 continuity and zero second derivative at
/// the boundaries.
///
/// Abscissae must be strictly increasing; the solver's meshers guarantee
/// this, so unlike a general-purpose interpolator no sorting is applied
/// and unsorted input is a construction error.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline<T: Float> {
    xs: Vec<T>,
    coeffs: Vec<SegmentCoeffs<T>>,
}

impl<T: Float> NaturalCubicSpline<T> {
    /// Construct a natural cubic spline over `(xs, ys)`.
    ///
    /// Requires at least 3 strictly increasing abscissae and matching
    /// array lengths.
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 3 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 3,
            });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(InterpolationError::InvalidInput(
                "abscissae must be strictly increasing".to_string(),
            ));
        }

        let coeffs = Self::compute_coefficients(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            coeffs,
        })
    }

    /// Solve the tridiagonal system for the second derivatives by the
    /// Thomas algorithm, then assemble the per-segment polynomials.
    fn compute_coefficients(xs: &[T], ys: &[T]) -> Vec<SegmentCoeffs<T>> {
        let n = xs.len();
        let two = T::from(2.0).unwrap();
        let six = T::from(6.0).unwrap();

        let h: Vec<T> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();

        // Second derivatives m[0..n], natural boundary m[0] = m[n-1] = 0.
        let mut m: Vec<T> = vec![T::zero(); n];
        let interior = n - 2;

        let mut diag: Vec<T> = Vec::with_capacity(interior);
        let mut rhs: Vec<T> = Vec::with_capacity(interior);
        for i in 1..n - 1 {
            diag.push(two * (h[i - 1] + h[i]));
            rhs.push(six * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]));
        }

        // Thomas forward sweep; sub/super-diagonals are h[1..] and h[..].
        let mut c_prime: Vec<T> = vec![T::zero(); interior];
        let mut d_prime: Vec<T> = vec![T::zero(); interior];
        c_prime[0] = if interior > 1 { h[1] / diag[0] } else { T::zero() };
        d_prime[0] = rhs[0] / diag[0];
        for i in 1..interior {
            let denom = diag[i] - h[i] * c_prime[i - 1];
            if i < interior - 1 {
                c_prime[i] = h[i + 1] / denom;
            }
            d_prime[i] = (rhs[i] - h[i] * d_prime[i - 1]) / denom;
        }

        m[n - 2] = d_prime[interior - 1];
        for i in (1..interior).rev() {
            m[i] = d_prime[i - 1] - c_prime[i - 1] * m[i + 1];
        }

        (0..n - 1)
            .map(|i| SegmentCoeffs {
                a: ys[i],
                b: (ys[i + 1] - ys[i]) / h[i] - h[i] * (two * m[i] + m[i + 1]) / six,
                c: m[i] / two,
                d: (m[i + 1] - m[i]) / (six * h[i]),
            })
            .collect()
    }

    /// Segment index such that `xs[i] <= x < xs[i+1]`, clamped to the
    /// valid segment range.
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        pos.clamp(1, self.xs.len() - 1) - 1
    }

    #[inline]
    fn check_domain(&self, x: T) -> Result<(), InterpolationError> {
        let x_min = self.xs[0];
        let x_max = self.xs[self.xs.len() - 1];
        if x < x_min || x > x_max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: x_min.to_f64().unwrap_or(f64::NAN),
                max: x_max.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    /// Interpolated value at `x`.
    pub fn value(&self, x: T) -> Result<T, InterpolationError> {
        self.check_domain(x)?;
        let i = self.find_segment(x);
        let s = &self.coeffs[i];
        let dx = x - self.xs[i];
        Ok(s.a + dx * (s.b + dx * (s.c + dx * s.d)))
    }

    /// First derivative of the spline at `x`.
    pub fn derivative(&self, x: T) -> Result<T, InterpolationError> {
        self.check_domain(x)?;
        let i = self.find_segment(x);
        let s = &self.coeffs[i];
        let dx = x - self.xs[i];
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        Ok(s.b + dx * (two * s.c + three * s.d * dx))
    }

    /// Second derivative of the spline at `x`.
    pub fn second_derivative(&self, x: T) -> Result<T, InterpolationError> {
        self.check_domain(x)?;
        let i = self.find_segment(x);
        let s = &self.coeffs[i];
        let dx = x - self.xs[i];
        let two = T::from(2.0).unwrap();
        let six = T::from(6.0).unwrap();
        Ok(two * s.c + six * s.d * dx)
    }

    /// The interpolation domain `(min, max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_insufficient_data() {
        let result = NaturalCubicSpline::new(&[0.0, 1.0], &[0.0, 1.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::InsufficientData { got: 2, need: 3 })
        ));
    }

    #[test]
    fn test_new_mismatched_lengths() {
        let result = NaturalCubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_rejects_unsorted() {
        let result = NaturalCubicSpline::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 4.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reproduces_knots() {
        let xs = [0.0, 0.7, 1.5, 2.0, 3.1];
        let ys = [1.0, -0.5, 2.0, 0.0, 4.0];
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((spline.value(*x).unwrap() - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_data_exact() {
        // A natural spline through collinear points is the line itself,
        // so value and derivatives are exact.
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();
        assert!((spline.value(1.5).unwrap() - 4.0).abs() < 1e-12);
        assert!((spline.derivative(1.5).unwrap() - 2.0).abs() < 1e-12);
        assert!(spline.second_derivative(1.5).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let xs: Vec<f64> = (0..21).map(|i| i as f64 * 0.1).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| (2.0 * x).sin()).collect();
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();

        let h = 1e-6;
        for &x in &[0.35, 0.9, 1.62] {
            let fd =
                (spline.value(x + h).unwrap() - spline.value(x - h).unwrap()) / (2.0 * h);
            let an = spline.derivative(x).unwrap();
            assert!(
                (fd - an).abs() < 1e-6,
                "derivative mismatch at {}: fd={}, analytic={}",
                x,
                fd,
                an
            );
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let spline =
            NaturalCubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert!(matches!(
            spline.value(-0.1),
            Err(InterpolationError::OutOfBounds { .. })
        ));
        assert!(matches!(
            spline.derivative(2.1),
            Err(InterpolationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_natural_boundary() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 4.0, 9.0, 16.0];
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();
        assert!(spline.second_derivative(0.0).unwrap().abs() < 1e-12);
        assert!(spline.second_derivative(4.0).unwrap().abs() < 1e-12);
    }
}
