//! Fixed-capacity circular delay line with interpolated reads.
//!
//! One algorithm type, [`DelayBuffer`], runs over any contiguous sample storage.
//! Only where the storage comes from differs:
//!
//! | Alias | Storage | Capacity | Allocation |
//! |-------|---------|----------|------------|
//! | [`DelayLine<T, N>`] | inline `[T; N]` | compile time | none |
//! | [`DelayLineView<'a, T>`] | caller's `&'a mut [T]` | construction | none (caller owns memory) |
//! | [`HeapDelayLine<T>`] | `Vec<T>` (`std` only) | construction | once, at construction |
//!
//! # Cursor Convention
//!
//! The write cursor moves *backward* through the ring on every write, so a delay
//! of `d` is simply the slot `d` positions *forward* of the cursor:
//!
//! ```text
//!   slot:   0     1     2     3     4     5
//!         [ .  ][ .  ][ x3 ][ x2 ][ x1 ][ x0 ]
//!                  ^     ^     ^
//!          write_ptr  delay 1  delay 2
//! ```
//!
//! `x3` is the most recent write. Delay 1 reads it back; delay 0 would read the
//! oldest slot, the one about to be overwritten.
//!
//! Reading before writing on each tick (see [`DelayBuffer::read_write`]) makes
//! a stored delay of `d` return the sample written exactly `d` ticks earlier.
//!
//! # Read Strategies
//!
//! | Method | Delay source | Interpolation | Clamped |
//! |--------|--------------|---------------|---------|
//! | [`read`](DelayBuffer::read) | stored | linear | yes (at `set_delay*`) |
//! | [`read_at`](DelayBuffer::read_at) | argument | linear | no |
//! | [`read_hermite`](DelayBuffer::read_hermite) | argument | 4-point Hermite | no |
//! | [`allpass`](DelayBuffer::allpass) | argument | none | no |
//!
//! The argument-driven reads do not clamp: a delay at or beyond capacity
//! aliases around the ring instead of saturating.
//!
//! # Real-Time Contract
//!
//! `write`, every `read*`, `read_write` and `allpass` do a fixed number of
//! slice accesses and arithmetic operations regardless of capacity. They never
//! allocate, block or log. Preconditions (capacity, storage length, delay >= 1)
//! are checked with `debug_assert!` only.

use core::marker::PhantomData;

use crate::{DelayError, Sample, hermite4, lerp};

/// Circular delay buffer over caller-chosen storage.
///
/// Usually named through one of the aliases [`DelayLine`], [`DelayLineView`]
/// or [`HeapDelayLine`].
///
/// # Example
///
/// ```rust
/// use tapline_core::DelayLine;
///
/// // 10 ms at 48 kHz
/// let mut delay: DelayLine<f32, 480> = DelayLine::new();
/// delay.set_delay_frac(240.5);
///
/// let input = [1.0, 0.0, 0.0, 0.0];
/// for &x in &input {
///     let echo = delay.read();
///     delay.write(x + echo * 0.4);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DelayBuffer<T, S> {
    /// Backing samples; only the first `capacity` are used
    storage: S,
    /// Ring length in samples
    capacity: usize,
    /// Next slot to be written
    write_ptr: usize,
    /// Whole-sample part of the stored delay
    delay: usize,
    /// Fractional part of the stored delay, in [0, 1)
    frac: f32,
    _sample: PhantomData<T>,
}

/// Delay line owning an inline array of `N` samples.
///
/// ```rust
/// use tapline_core::DelayLine;
///
/// let mut delay: DelayLine<f32, 64> = DelayLine::new();
/// delay.set_delay(10);
/// assert_eq!(delay.capacity(), 64);
/// ```
pub type DelayLine<T, const N: usize> = DelayBuffer<T, [T; N]>;

/// Delay line operating on a buffer owned elsewhere (bring your own memory).
///
/// Useful when the audio memory comes from a static pool, external SDRAM, or
/// one large arena carved into several lines of different lengths.
///
/// ```rust
/// use tapline_core::DelayLineView;
///
/// let mut pool = [0.0f32; 1024];
/// let (short, long) = pool.split_at_mut(256);
///
/// let mut early = DelayLineView::from_slice(short);
/// let mut late = DelayLineView::from_storage(long, 700);
///
/// early.write(0.5);
/// late.write(0.5);
/// assert_eq!(late.capacity(), 700);
/// ```
pub type DelayLineView<'a, T> = DelayBuffer<T, &'a mut [T]>;

/// Heap-allocated delay line whose capacity is chosen at runtime.
///
/// The buffer is allocated once in
/// [`with_capacity`](DelayBuffer::with_capacity) and never reallocated.
#[cfg(feature = "std")]
pub type HeapDelayLine<T> = DelayBuffer<T, Vec<T>>;

impl<T, S> DelayBuffer<T, S>
where
    T: Sample,
    S: AsRef<[T]> + AsMut<[T]>,
{
    /// Binds `storage` as a ring of `capacity` samples and resets it.
    ///
    /// The first `capacity` slots are zeroed; anything beyond them is left
    /// untouched and never read.
    ///
    /// # Preconditions
    ///
    /// `capacity >= 2` and `storage` holds at least `capacity` samples. Checked
    /// only in debug builds; use [`try_from_storage`](Self::try_from_storage)
    /// where the values are not known to be valid.
    pub fn from_storage(storage: S, capacity: usize) -> Self {
        debug_assert!(capacity >= 2, "Delay capacity must be >= 2");
        debug_assert!(
            storage.as_ref().len() >= capacity,
            "Delay storage shorter than capacity"
        );

        let mut line = Self {
            storage,
            capacity,
            write_ptr: 0,
            delay: 1,
            frac: 0.0,
            _sample: PhantomData,
        };
        line.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!("delay_init: capacity {capacity}");

        line
    }

    /// Checked version of [`from_storage`](Self::from_storage).
    ///
    /// # Errors
    ///
    /// - [`DelayError::CapacityTooSmall`] if `capacity < 2`
    /// - [`DelayError::StorageTooShort`] if `storage` holds fewer than `capacity` samples
    pub fn try_from_storage(storage: S, capacity: usize) -> Result<Self, DelayError> {
        if capacity < 2 {
            return Err(DelayError::CapacityTooSmall { capacity });
        }
        let len = storage.as_ref().len();
        if len < capacity {
            return Err(DelayError::StorageTooShort { len, capacity });
        }
        Ok(Self::from_storage(storage, capacity))
    }

    /// Clears the history, moves the write cursor to slot 0 and sets the
    /// delay to 1 sample.
    ///
    /// The fractional part of the stored delay is left as it was.
    pub fn reset(&mut self) {
        let capacity = self.capacity;
        self.storage.as_mut()[..capacity].fill(T::silence());
        self.write_ptr = 0;
        self.delay = 1;

        #[cfg(feature = "tracing")]
        tracing::trace!("delay_reset: capacity {capacity}");
    }

    /// Sets a whole-sample delay used by [`read`](Self::read).
    ///
    /// Values at or above capacity saturate to `capacity - 1`. Clears any
    /// fractional part.
    #[inline]
    pub fn set_delay(&mut self, samples: usize) {
        self.frac = 0.0;
        self.delay = self.clamp_delay(samples);
    }

    /// Sets a fractional delay used by [`read`](Self::read).
    ///
    /// The integer part saturates to `capacity - 1`; the fractional part is
    /// kept as-is even when the integer part saturates. Values below 1.0 are a
    /// precondition violation.
    #[inline]
    pub fn set_delay_frac(&mut self, samples: f32) {
        debug_assert!(samples >= 1.0, "Delay must be >= 1 sample, got {samples}");
        let int = samples as usize;
        self.frac = samples - int as f32;
        self.delay = self.clamp_delay(int);
    }

    /// Returns the stored delay in samples, including the fractional part.
    #[inline]
    pub fn delay(&self) -> f32 {
        self.delay as f32 + self.frac
    }

    /// Returns the ring length in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the longest delay [`set_delay`](Self::set_delay) accepts without saturating.
    #[inline]
    pub fn max_delay(&self) -> usize {
        self.capacity - 1
    }

    /// Writes a sample at the cursor and steps the cursor back one slot.
    #[inline]
    pub fn write(&mut self, sample: T) {
        let capacity = self.capacity;
        self.storage.as_mut()[self.write_ptr] = sample;
        self.write_ptr = (self.write_ptr + capacity - 1) % capacity;
    }

    /// Reads at the stored delay, linearly interpolating the fractional part.
    #[inline]
    pub fn read(&self) -> T {
        let a = self.tap(self.delay);
        let b = self.tap(self.delay + 1);
        lerp(a, b, self.frac)
    }

    /// Reads at an arbitrary fractional delay with linear interpolation.
    ///
    /// The stored delay is not used or changed. `delay` is not clamped: values
    /// at or beyond capacity wrap around the ring.
    #[inline]
    pub fn read_at(&self, delay: f32) -> T {
        let (int, frac) = self.split(delay);
        let a = self.tap(int);
        let b = self.tap(int + 1);
        lerp(a, b, frac)
    }

    /// Reads at an arbitrary fractional delay with 4-point Hermite interpolation.
    ///
    /// Uses the samples at delays `int - 1`, `int`, `int + 1` and `int + 2`, so
    /// it costs two more fetches than [`read_at`](Self::read_at) but produces
    /// fewer artifacts when the delay is swept quickly. Not clamped.
    #[inline]
    pub fn read_hermite(&self, delay: f32) -> T {
        let (int, frac) = self.split(delay);
        let capacity = self.capacity;
        let t = self.write_ptr + int + capacity;
        let line = self.storage.as_ref();

        let xm1 = line[(t - 1) % capacity];
        let x0 = line[t % capacity];
        let x1 = line[(t + 1) % capacity];
        let x2 = line[(t + 2) % capacity];

        hermite4(xm1, x0, x1, x2, frac)
    }

    /// First-order allpass section: reads the tap at `delay`, writes the
    /// feedback sum and returns the feed-forward output, in one step.
    ///
    /// ```text
    /// history = line[delay]
    /// w       = input + g·history      (written)
    /// output  = history - g·w
    /// ```
    ///
    /// Stable for `|coefficient| < 1`. `delay` is a whole number of samples
    /// and is not clamped.
    #[inline]
    pub fn allpass(&mut self, sample: T, delay: usize, coefficient: T) -> T {
        let history = self.tap(delay);
        let to_write = sample + coefficient * history;
        self.write(to_write);
        history - coefficient * to_write
    }

    /// Reads at the stored delay, then writes `sample`.
    ///
    /// With a whole-sample delay `d`, the value returned on tick `n` is the
    /// sample passed in on tick `n - d`.
    #[inline]
    pub fn read_write(&mut self, sample: T) -> T {
        let output = self.read();
        self.write(sample);
        output
    }

    /// Sample `offset` slots forward of the write cursor, wrapping.
    #[inline]
    fn tap(&self, offset: usize) -> T {
        let capacity = self.capacity;
        self.storage.as_ref()[(self.write_ptr + offset % capacity) % capacity]
    }

    /// Integer part reduced into the ring, plus the fractional remainder.
    #[inline]
    fn split(&self, delay: f32) -> (usize, f32) {
        let int = delay as usize;
        let frac = delay - int as f32;
        (int % self.capacity, frac)
    }

    fn clamp_delay(&self, samples: usize) -> usize {
        debug_assert!(samples >= 1, "Delay must be >= 1 sample");
        if samples < self.capacity {
            samples
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "delay_clamp: {samples} -> {} (capacity {})",
                self.capacity - 1,
                self.capacity
            );
            self.capacity - 1
        }
    }
}

impl<T: Sample, const N: usize> DelayBuffer<T, [T; N]> {
    /// Creates a silent delay line holding `N` samples inline.
    ///
    /// `N` must be at least 2; smaller sizes fail to compile.
    pub fn new() -> Self {
        const { assert!(N >= 2, "DelayLine capacity must be >= 2") };
        Self::from_storage([T::silence(); N], N)
    }
}

impl<T: Sample, const N: usize> Default for DelayBuffer<T, [T; N]> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Sample> DelayBuffer<T, &'a mut [T]> {
    /// Uses the whole of `buffer` as the ring. Capacity is `buffer.len()`.
    pub fn from_slice(buffer: &'a mut [T]) -> Self {
        let capacity = buffer.len();
        Self::from_storage(buffer, capacity)
    }
}

#[cfg(feature = "std")]
impl<T: Sample> DelayBuffer<T, Vec<T>> {
    /// Allocates a silent ring of `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 2, "Delay capacity must be >= 2");
        Self::from_storage(vec![T::silence(); capacity], capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate alloc;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_new_is_silent() {
        let delay: DelayLine<f32, 8> = DelayLine::new();
        assert_eq!(delay.write_ptr, 0);
        assert_eq!(delay.delay, 1);
        assert_eq!(delay.frac, 0.0);
        for d in 0..16 {
            assert_eq!(delay.read_at(d as f32 + 0.5), 0.0);
        }
    }

    #[test]
    fn test_write_moves_cursor_backward() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();

        delay.write(1.0);
        assert_eq!(delay.storage[0], 1.0);
        assert_eq!(delay.write_ptr, 7);

        delay.write(2.0);
        assert_eq!(delay.storage[7], 2.0);
        assert_eq!(delay.write_ptr, 6);

        for _ in 0..6 {
            delay.write(0.0);
        }
        assert_eq!(delay.write_ptr, 0);
    }

    #[test]
    fn test_delay_one_is_most_recent_write() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();
        delay.write(3.0);
        assert_eq!(delay.read(), 3.0);

        delay.write(4.0);
        assert_eq!(delay.read(), 4.0);
        assert_eq!(delay.read_at(2.0), 3.0);
    }

    #[test]
    fn test_set_delay_clamps_to_capacity() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();

        delay.set_delay(7);
        assert_eq!(delay.delay, 7);

        delay.set_delay(8);
        assert_eq!(delay.delay, 7);

        delay.set_delay(100);
        assert_eq!(delay.delay, 7);
        assert_eq!(delay.max_delay(), 7);
    }

    #[test]
    fn test_set_delay_frac_splits() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();

        delay.set_delay_frac(3.25);
        assert_eq!(delay.delay, 3);
        assert_eq!(delay.frac, 0.25);
        assert_eq!(delay.delay(), 3.25);

        // Integer part saturates, fraction survives
        delay.set_delay_frac(20.5);
        assert_eq!(delay.delay, 7);
        assert_eq!(delay.frac, 0.5);
    }

    #[test]
    fn test_integer_delay_clears_fraction() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();
        delay.set_delay_frac(2.75);
        delay.set_delay(4);
        assert_eq!(delay.frac, 0.0);
        assert_eq!(delay.delay(), 4.0);
    }

    #[test]
    fn test_reset_keeps_fraction() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();
        delay.set_delay_frac(5.5);
        for i in 0..5 {
            delay.write(i as f32 + 1.0);
        }

        delay.reset();

        assert_eq!(delay.write_ptr, 0);
        assert_eq!(delay.delay, 1);
        assert_eq!(delay.frac, 0.5);
        assert!(delay.storage.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_fractional_read_blends_neighbours() {
        let mut delay: DelayLine<f32, 16> = DelayLine::new();
        delay.write(10.0); // delay 2 after the next write
        delay.write(20.0); // delay 1

        delay.set_delay_frac(1.5);
        assert_eq!(delay.read(), 15.0);

        delay.set_delay_frac(1.25);
        assert_eq!(delay.read(), 17.5);
    }

    #[test]
    fn test_read_at_leaves_state_alone() {
        let mut delay: DelayLine<f32, 16> = DelayLine::new();
        delay.set_delay_frac(3.5);
        delay.write(1.0);

        let _ = delay.read_at(7.25);
        let _ = delay.read_hermite(7.25);

        assert_eq!(delay.delay, 3);
        assert_eq!(delay.frac, 0.5);
    }

    #[test]
    fn test_read_at_aliases_past_capacity() {
        let mut delay: DelayLine<f32, 8> = DelayLine::new();
        for i in 0..8 {
            delay.write(i as f32);
        }

        for d in 1..7 {
            let d = d as f32 + 0.5;
            assert_eq!(delay.read_at(d + 8.0), delay.read_at(d));
            assert_eq!(delay.read_at(d + 16.0), delay.read_at(d));
            assert_eq!(delay.read_hermite(d + 8.0), delay.read_hermite(d));
        }
    }

    #[test]
    fn test_hermite_integer_delay_matches_linear() {
        let mut delay: DelayLine<f32, 32> = DelayLine::new();
        for i in 0..20 {
            delay.write(libm::sinf(i as f32 * 0.7));
        }

        for d in 2..15 {
            let d = d as f32;
            assert_eq!(delay.read_hermite(d), delay.read_at(d));
        }
    }

    #[test]
    fn test_allpass_zero_coefficient_is_pure_delay() {
        let mut delay: DelayLine<f32, 16> = DelayLine::new();
        let input: Vec<f32> = (1..=12).map(|i| i as f32).collect();

        let output: Vec<f32> = input.iter().map(|&x| delay.allpass(x, 4, 0.0)).collect();

        assert_eq!(&output[..4], &[0.0; 4]);
        assert_eq!(&output[4..], &input[..8]);
    }

    #[test]
    fn test_allpass_first_output_is_negated_coefficient() {
        let mut delay: DelayLine<f32, 16> = DelayLine::new();
        let out = delay.allpass(1.0, 5, 0.6);
        assert!((out + 0.6).abs() < 1e-7, "got {out}");
        // The feedback sum went into the line
        assert_eq!(delay.read_at(1.0), 1.0);
    }

    #[test]
    fn test_read_write_delays_by_stored_delay() {
        let mut delay: DelayLine<f32, 16> = DelayLine::new();
        delay.set_delay(3);

        let output: Vec<f32> = (1..=8).map(|i| delay.read_write(i as f32)).collect();
        assert_eq!(output, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_view_uses_only_capacity_slots() {
        let mut buf = [9.0f32; 12];
        {
            let mut view = DelayLineView::from_storage(&mut buf[..], 8);
            assert_eq!(view.capacity(), 8);
            for i in 0..20 {
                view.write(i as f32);
            }
            assert_eq!(view.read(), 19.0);
        }
        assert!(buf[8..].iter().all(|&s| s == 9.0));
        assert!(buf[..8].iter().all(|&s| s != 9.0));
    }

    #[test]
    fn test_view_from_slice_takes_full_length() {
        let mut buf = [0.5f32; 10];
        let view = DelayLineView::from_slice(&mut buf[..]);
        assert_eq!(view.capacity(), 10);
        assert_eq!(view.read_at(4.0), 0.0);
    }

    #[test]
    fn test_try_from_storage_rejects_bad_input() {
        let mut buf = [0.0f32; 4];

        let err = DelayLineView::try_from_storage(&mut buf[..], 1).unwrap_err();
        assert_eq!(err, DelayError::CapacityTooSmall { capacity: 1 });

        let err = DelayLineView::try_from_storage(&mut buf[..], 5).unwrap_err();
        assert_eq!(
            err,
            DelayError::StorageTooShort {
                len: 4,
                capacity: 5
            }
        );

        assert!(DelayLineView::try_from_storage(&mut buf[..], 4).is_ok());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_heap_delay_line() {
        let mut delay: HeapDelayLine<f32> = HeapDelayLine::with_capacity(100);
        assert_eq!(delay.capacity(), 100);

        delay.set_delay(99);
        delay.write(1.0);
        for _ in 0..98 {
            delay.write(0.0);
        }
        assert_eq!(delay.read(), 1.0);
    }

    #[cfg(feature = "std")]
    #[test]
    #[should_panic]
    fn test_heap_capacity_too_small_panics() {
        let _delay: HeapDelayLine<f32> = HeapDelayLine::with_capacity(1);
    }

    #[test]
    fn test_f64_samples() {
        let mut delay: DelayLine<f64, 8> = DelayLine::new();
        delay.write(0.25);
        delay.write(0.75);
        assert!((delay.read_at(1.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_owned_line_clones_independently() {
        let mut a: DelayLine<f32, 8> = DelayLine::new();
        a.write(1.0);
        let mut b = a.clone();
        b.write(2.0);

        assert_eq!(a.read(), 1.0);
        assert_eq!(b.read(), 2.0);
    }
}
