//! Numeric bound for delay-line samples.

use num_traits::Num;

/// A value that can be stored in and interpolated by a delay line.
///
/// Anything with ring arithmetic, a zero, and a lossless conversion from the
/// `f32` fractional weights qualifies. In practice this is `f32` or `f64`.
///
/// The trait is blanket-implemented, so it never needs to be implemented by hand.
pub trait Sample: Copy + Num + From<f32> {
    /// The silent sample (additive identity).
    #[inline]
    fn silence() -> Self {
        Self::zero()
    }
}

impl<T> Sample for T where T: Copy + Num + From<f32> {}
