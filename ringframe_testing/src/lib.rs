//! Test support for exercising [`ringframe`] parsers and stores.
//!
//! Provides a sample protocol header, wire builders, helpers that split a
//! stream at chosen offsets, a recorder for handler invocations, and a
//! serialised [`logtest`] capture.
//!
//! ```rust
//! use ringframe_testing::{FrameLog, demo_frame, split_at};
//!
//! let wire = demo_frame(7, b"hello");
//! let log = FrameLog::default();
//! let mut parser = log.parser(2048);
//! for chunk in split_at(&wire, &[3, 12]) {
//!     assert!(parser.handle_data(chunk));
//! }
//! assert_eq!(log.bodies(), [b"hello".to_vec()]);
//! assert_eq!(log.headers()[0].msg_type, 7);
//! ```

mod header;
pub mod logging;
mod recorder;
mod wire;

pub use header::DemoHeader;
pub use logging::{LoggerHandle, logger};
pub use recorder::{FrameLog, LoggedParser};
pub use wire::{byte_by_byte, demo_frame, demo_stream, prefixed_frame, split_at};
