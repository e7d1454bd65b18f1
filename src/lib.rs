#![doc(html_root_url = "https://docs.rs/ringframe/latest")]
//! Public API for the `ringframe` library.
//!
//! This crate reassembles length-prefixed frames from an arbitrarily
//! fragmented byte stream. It sits between transport I/O and message
//! handlers: callers push whatever chunks the transport produced and receive
//! whole headers and bodies through handler callbacks.
//!
//! - [`store::RingStore`] is a fixed-capacity, thread-safe ring buffer with a
//!   zero-copy read mode.
//! - [`parser::FrameParser`] drives a header-then-body state machine over a
//!   store it owns, generic over any [`parser::WireHeader`].

pub mod byte_order;
pub mod metrics;
pub mod parser;
pub mod store;

pub use parser::{
    FrameParser,
    LengthField,
    LengthPrefix,
    ParserConfig,
    ParserState,
    Progress,
    RejectedHeaderPolicy,
    WireHeader,
};
pub use store::{CapacityError, DEFAULT_CAPACITY, RingStore, StoreError};
