//! Configuration for [`FrameParser`](super::FrameParser).

use crate::store::{CapacityError, DEFAULT_CAPACITY, RingStore};

/// What the parser does when the header handler returns `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RejectedHeaderPolicy {
    /// Treat the header handler's result as advisory and deliver the body
    /// to the body handler regardless.
    #[default]
    Deliver,

    /// Drain the rejected header's body from the stream without calling the
    /// body handler, then resume with the next header.
    Discard,
}

impl RejectedHeaderPolicy {
    /// Returns the policy name as a static string for logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deliver => "deliver",
            Self::Discard => "discard",
        }
    }
}

/// Configuration for a [`FrameParser`](super::FrameParser).
///
/// # Examples
///
/// ```
/// use ringframe::parser::{ParserConfig, RejectedHeaderPolicy};
///
/// let config = ParserConfig::default()
///     .capacity(4096)
///     .rejected_headers(RejectedHeaderPolicy::Discard);
///
/// assert_eq!(config.capacity, 4096);
/// assert!(config.build_store().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Capacity of the parser's ring store in bytes. Must be a non-zero
    /// power of two and at least as large as the biggest frame part the
    /// stream will carry.
    ///
    /// Default: 2048.
    pub capacity: usize,

    /// Handling of headers the header handler rejects.
    ///
    /// Default: [`RejectedHeaderPolicy::Deliver`].
    pub rejected_headers: RejectedHeaderPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            rejected_headers: RejectedHeaderPolicy::default(),
        }
    }
}

impl ParserConfig {
    /// Set the ring store capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the rejected-header policy.
    #[must_use]
    pub fn rejected_headers(mut self, policy: RejectedHeaderPolicy) -> Self {
        self.rejected_headers = policy;
        self
    }

    /// Allocate the ring store described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the configured capacity is zero or not a
    /// power of two.
    pub fn build_store(&self) -> Result<RingStore, CapacityError> { RingStore::try_new(self.capacity) }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ParserConfig, RejectedHeaderPolicy};
    use crate::store::CapacityError;

    #[test]
    fn defaults_match_store_default() {
        let config = ParserConfig::default();
        assert_eq!(config.capacity, 2048);
        assert_eq!(config.rejected_headers, RejectedHeaderPolicy::Deliver);
    }

    #[rstest]
    #[case(0, CapacityError::Zero)]
    #[case(100, CapacityError::NotPowerOfTwo(100))]
    fn invalid_capacity_is_reported(#[case] capacity: usize, #[case] expected: CapacityError) {
        let err = ParserConfig::default()
            .capacity(capacity)
            .build_store()
            .expect_err("capacity should be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(RejectedHeaderPolicy::Deliver, "deliver")]
    #[case(RejectedHeaderPolicy::Discard, "discard")]
    fn policy_names(#[case] policy: RejectedHeaderPolicy, #[case] name: &str) {
        assert_eq!(policy.as_str(), name);
    }
}
