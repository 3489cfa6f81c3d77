//! Standard normal distribution functions.
//!
//! Provides the density, the cumulative distribution (via an erfc
//! approximation) and the inverse cumulative distribution (Acklam's
//! rational approximation). The forward functions are generic over
//! `T: Float`; the inverse works on `f64`, which is all the meshers
//! need for quantile-based grid truncation.

use num_traits::Float;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function approximation using Horner's method.
///
/// Abramowitz and Stegun formula 7.1.26, maximum error 1.5e-7 for all x.
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let zero = T::zero();

    let abs_x = x.abs();

    let a1 = T::from(0.254829592).unwrap();
    let a2 = T::from(-0.284496736).unwrap();
    let a3 = T::from(1.421413741).unwrap();
    let a4 = T::from(-1.453152027).unwrap();
    let a5 = T::from(1.061405429).unwrap();
    let p = T::from(0.3275911).unwrap();

    let t = one / (one + p * abs_x);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    let two = T::from(2.0).unwrap();
    if x < zero {
        two - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal probability density function.
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let half = T::from(0.5).unwrap();
    let c = T::from(FRAC_1_SQRT_2PI).unwrap();
    c * (-half * x * x).exp()
}

/// Standard normal cumulative distribution function.
///
/// `Phi(x) = erfc(-x / sqrt(2)) / 2`, accurate to roughly 1e-7.
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let sqrt_2 = T::from(std::f64::consts::SQRT_2).unwrap();
    let half = T::from(0.5).unwrap();
    half * erfc_approx(-x / sqrt_2)
}

/// Inverse of the standard normal cumulative distribution function.
///
/// Acklam's rational approximation (relative error below 1.15e-9 over
/// the whole domain). The argument is clamped into the open unit
/// interval, so tail quantiles stay finite for `p` arbitrarily close to
/// 0 or 1.
pub fn inverse_norm_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    let p = p.clamp(1e-16, 1.0 - 1e-16);

    if p < P_LOW {
        // lower tail
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p > 1.0 - P_LOW {
        // upper tail, by symmetry
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else {
        // central region
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_cdf_at_zero() {
        assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_norm_cdf_known_values() {
        assert_relative_eq!(norm_cdf(1.96_f64), 0.975_002, epsilon = 1e-4);
        assert_relative_eq!(norm_cdf(-1.96_f64), 0.024_998, epsilon = 1e-4);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for &x in &[0.3, 1.1, 2.7] {
            let sum = norm_cdf(x) + norm_cdf(-x);
            assert!((sum - 1.0_f64).abs() < 1e-7);
        }
    }

    #[test]
    fn test_norm_pdf_at_zero() {
        assert!((norm_pdf(0.0_f64) - 0.398_942_280_4).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_norm_cdf_median() {
        assert!(inverse_norm_cdf(0.5).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_norm_cdf_roundtrip() {
        for &p in &[0.001, 0.02, 0.25, 0.5, 0.75, 0.9, 0.999] {
            let x = inverse_norm_cdf(p);
            assert!(
                (norm_cdf(x) - p).abs() < 1e-6,
                "roundtrip failed at p={}: x={}, cdf={}",
                p,
                x,
                norm_cdf(x)
            );
        }
    }

    #[test]
    fn test_inverse_norm_cdf_known_quantiles() {
        assert!((inverse_norm_cdf(0.975) - 1.959_964).abs() < 1e-5);
        assert!((inverse_norm_cdf(0.75) - 0.674_490).abs() < 1e-5);
    }

    #[test]
    fn test_inverse_norm_cdf_clamps_degenerate_input() {
        assert!(inverse_norm_cdf(0.0).is_finite());
        assert!(inverse_norm_cdf(1.0).is_finite());
    }
}
