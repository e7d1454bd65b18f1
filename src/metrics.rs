//! Metric helpers for `ringframe`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking completed frame parts.
pub const FRAMES_TOTAL: &str = "ringframe_frames_total";
/// Name of the counter tracking writes rejected for lack of space.
pub const OVERFLOWS_TOTAL: &str = "ringframe_overflows_total";
/// Name of the counter tracking bodies a handler declined to consume.
pub const DEFERRALS_TOTAL: &str = "ringframe_deferrals_total";

/// Which half of a frame completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePart {
    /// A header was decoded and handed to the header handler.
    Header,
    /// A body was consumed by the body handler or discarded.
    Body,
}

impl FramePart {
    /// Label value used for this part.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FramePart::Header => "header",
            FramePart::Body => "body",
        }
    }
}

/// Record a completed frame part.
pub fn inc_frames(part: FramePart) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_TOTAL, "part" => part.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = part;
}

/// Record a rejected write.
pub fn inc_overflows() {
    #[cfg(feature = "metrics")]
    counter!(OVERFLOWS_TOTAL).increment(1);
}

/// Record a body the handler deferred.
pub fn inc_deferrals() {
    #[cfg(feature = "metrics")]
    counter!(DEFERRALS_TOTAL).increment(1);
}
