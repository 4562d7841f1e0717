//! Interpolation kernels for fractional delay reads.
//!
//! Both kernels take a fractional position `frac` in `[0, 1)` measured from
//! `x0` toward `x1`.
//!
//! | Kernel | Points | Cost | Character |
//! |--------|--------|------|-----------|
//! | [`lerp`] | 2 | 1 mul | Cheap; dulls highs under modulation |
//! | [`hermite4`] | 4 | ~6 mul | Smoother for modulated delays (chorus, flanger) |
//!
//! Both are exact on linear data, which makes a ramp a good regression signal.

use crate::Sample;

/// Linear interpolation between two samples.
///
/// # Arguments
/// * `a` - Value at `frac = 0`
/// * `b` - Value at `frac = 1`
/// * `frac` - Fractional position (0.0 to 1.0)
///
/// # Example
/// ```rust
/// use tapline_core::lerp;
///
/// assert_eq!(lerp(2.0f32, 4.0, 0.5), 3.0);
/// ```
#[inline]
pub fn lerp<T: Sample>(a: T, b: T, frac: f32) -> T {
    a + (b - a) * T::from(frac)
}

/// Four-point, third-order Hermite interpolation.
///
/// `xm1`, `x0`, `x1`, `x2` are consecutive samples; the result lies between
/// `x0` and `x1`.
///
/// Evaluated in Horner form:
///
/// ```text
/// c     = (x1 - xm1) / 2
/// v     = x0 - x1
/// w     = c + v
/// a     = w + v + (x2 - x0) / 2
/// b_neg = w + a
/// y     = ((a·f - b_neg)·f + c)·f + x0
/// ```
///
/// # Example
/// ```rust
/// use tapline_core::hermite4;
///
/// // Exact on a straight line
/// let y = hermite4(0.0f32, 1.0, 2.0, 3.0, 0.25);
/// assert!((y - 1.25).abs() < 1e-6);
/// ```
#[inline]
pub fn hermite4<T: Sample>(xm1: T, x0: T, x1: T, x2: T, frac: f32) -> T {
    let half = T::from(0.5);
    let c = (x1 - xm1) * half;
    let v = x0 - x1;
    let w = c + v;
    let a = w + v + (x2 - x0) * half;
    let b_neg = w + a;
    let f = T::from(frac);

    ((a * f - b_neg) * f + c) * f + x0
}
