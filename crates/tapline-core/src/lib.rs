//! Tapline Core - fixed-capacity delay line for real-time audio
//!
//! This crate provides the circular-buffer delay line that echo, chorus, flanger,
//! reverb and allpass-diffuser code is built on. Every per-sample operation is
//! O(1), allocation free and non-blocking.
//!
//! # Core Abstractions
//!
//! ## Delay Lines
//!
//! - [`DelayBuffer`] - Generic delay-line mechanics over any sample storage
//! - [`DelayLine`] - Inline storage, capacity fixed at compile time
//! - [`DelayLineView`] - Borrows a caller-supplied buffer (bring your own memory)
//! - [`HeapDelayLine`] - Heap storage allocated once at construction (`std` only)
//!
//! ## Read Strategies
//!
//! - [`DelayBuffer::read`] - Linear interpolation at the stored delay
//! - [`DelayBuffer::read_at`] - Linear interpolation at any delay
//! - [`DelayBuffer::read_hermite`] - 4-point Hermite interpolation at any delay
//! - [`DelayBuffer::allpass`] - Fused write and feedback read (first-order allpass)
//!
//! ## Utilities
//!
//! - Interpolation kernels: [`lerp`], [`hermite4`]
//! - [`Sample`] - Numeric bound for stored samples (`f32`, `f64`)
//! - [`DelayError`] - Setup-time storage validation errors
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tapline-core = { version = "0.1", default-features = false }
//! ```
//!
//! Without `std`, use [`DelayLine`] or [`DelayLineView`].
//!
//! # Example
//!
//! ```rust
//! use tapline_core::DelayLine;
//!
//! // Feedback echo, 100 samples
//! let mut line: DelayLine<f32, 1024> = DelayLine::new();
//! line.set_delay(100);
//!
//! let mut out = [0.0f32; 256];
//! for (i, y) in out.iter_mut().enumerate() {
//!     let x = if i == 0 { 1.0 } else { 0.0 };
//!     let echo = line.read();
//!     line.write(x + echo * 0.5);
//!     *y = x + echo;
//! }
//! assert_eq!(out[100], 1.0);
//! assert_eq!(out[200], 0.5);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or logging in the audio path
//! - **Precondition based**: Hot-path invariants are `debug_assert!`ed, not checked in release
//! - **One algorithm, many storages**: Owned, borrowed and heap lines share every line of DSP code

#![cfg_attr(not(feature = "std"), no_std)]

pub mod delay;
pub mod error;
pub mod interpolation;
pub mod sample;

// Re-export main types at crate root
pub use delay::{DelayBuffer, DelayLine, DelayLineView};
pub use error::DelayError;
pub use interpolation::{hermite4, lerp};
pub use sample::Sample;

#[cfg(feature = "std")]
pub use delay::HeapDelayLine;
