//! Error types for the ring store.
//!
//! Two failure classes exist. [`StoreError::InvalidParameter`] is caller
//! misuse and is never retried. [`StoreError::BufferOverflow`] is resource
//! pressure: the rejected bytes are dropped whole and the caller decides
//! whether to back off or provision a larger store.

use std::io;

use thiserror::Error;

/// Errors returned by [`RingStore::write`](super::RingStore::write).
///
/// # Examples
///
/// ```
/// use ringframe::store::{RingStore, StoreError};
///
/// let store = RingStore::new(4);
/// assert_eq!(store.write(&[]), Err(StoreError::InvalidParameter));
/// assert_eq!(
///     store.write(&[0; 5]),
///     Err(StoreError::BufferOverflow {
///         requested: 5,
///         available: 4,
///     })
/// );
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The write does not fit in the free space. Nothing was stored.
    #[error("buffer overflow: {requested} bytes requested, {available} bytes free")]
    BufferOverflow {
        /// Length of the rejected write.
        requested: usize,
        /// Free space at the time of the write.
        available: usize,
    },

    /// Empty input was passed to a write.
    #[error("invalid buffer parameter: write requires at least one byte")]
    InvalidParameter,
}

impl StoreError {
    /// Returns the error category as a string for logging and metrics.
    ///
    /// # Returns
    ///
    /// One of: `"overflow"` or `"invalid_parameter"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BufferOverflow { .. } => "overflow",
            Self::InvalidParameter => "invalid_parameter",
        }
    }

    /// Returns true when the error reflects resource pressure rather than
    /// misuse.
    #[must_use]
    pub fn is_overflow(&self) -> bool { matches!(self, Self::BufferOverflow { .. }) }
}

impl From<StoreError> for io::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidParameter => io::Error::new(io::ErrorKind::InvalidInput, err),
            StoreError::BufferOverflow { .. } => io::Error::other(err),
        }
    }
}

/// Rejected store capacity.
///
/// Only produced by [`RingStore::try_new`](super::RingStore::try_new);
/// [`RingStore::new`](super::RingStore::new) panics instead.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CapacityError {
    /// Capacity was zero.
    #[error("ring store capacity must be non-zero")]
    Zero,

    /// Capacity was not a power of two.
    #[error("ring store capacity must be a power of two, got {0}")]
    NotPowerOfTwo(usize),
}

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::{CapacityError, StoreError};

    #[rstest]
    #[case::overflow(
        StoreError::BufferOverflow { requested: 3, available: 1 },
        "overflow",
        io::ErrorKind::Other
    )]
    #[case::invalid(StoreError::InvalidParameter, "invalid_parameter", io::ErrorKind::InvalidInput)]
    fn errors_map_to_categories(
        #[case] err: StoreError,
        #[case] kind: &str,
        #[case] io_kind: io::ErrorKind,
    ) {
        assert_eq!(err.kind(), kind);
        assert_eq!(io::Error::from(err).kind(), io_kind);
    }

    #[test]
    fn overflow_message_names_both_sizes() {
        let err = StoreError::BufferOverflow {
            requested: 17,
            available: 16,
        };
        assert_eq!(
            err.to_string(),
            "buffer overflow: 17 bytes requested, 16 bytes free"
        );
        assert!(err.is_overflow());
        assert!(!StoreError::InvalidParameter.is_overflow());
    }

    #[test]
    fn capacity_error_reports_value() {
        assert_eq!(
            CapacityError::NotPowerOfTwo(3).to_string(),
            "ring store capacity must be a power of two, got 3"
        );
    }
}
