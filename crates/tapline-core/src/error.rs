//! Errors returned when binding storage to a delay line.
//!
//! The processing path (`write`, `read*`, `allpass`) has no error returns.
//! Only [`DelayBuffer::try_from_storage`](crate::DelayBuffer::try_from_storage)
//! reports failures, at setup time.

/// Reasons a backing store cannot host a delay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayError {
    /// Capacity must be at least 2 so that a delay of one sample is representable.
    CapacityTooSmall {
        /// The rejected capacity.
        capacity: usize,
    },
    /// The storage holds fewer samples than the requested capacity.
    StorageTooShort {
        /// Length of the supplied storage.
        len: usize,
        /// The requested capacity.
        capacity: usize,
    },
}

impl core::fmt::Display for DelayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CapacityTooSmall { capacity } => {
                write!(f, "delay capacity {capacity} below minimum of 2")
            }
            Self::StorageTooShort { len, capacity } => {
                write!(f, "storage too short: {len} < capacity {capacity}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DelayError {}
