//! Two-phase header/body frame parser.
//!
//! [`FrameParser`] owns a [`RingStore`] and reassembles discrete frames from
//! a byte stream delivered in chunks of any size. Each frame is a fixed-size
//! [`WireHeader`] followed by exactly as many body bytes as the header's
//! length field declares. Handlers fire once per completed header and once
//! per completed body, in arrival order, regardless of how the stream was
//! split.
//!
//! The body handler may return `false` to leave the body buffered. The
//! parser then stops for the current call and retries from the same state
//! on the next one.

mod config;
mod header;

use std::fmt;

use tracing::{debug, trace, warn};

pub use config::{ParserConfig, RejectedHeaderPolicy};
pub use header::{LengthField, LengthPrefix, WireHeader};

use crate::{
    metrics::{self, FramePart},
    store::{CapacityError, RingStore, StoreError},
};

/// Phase of the parsing state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for a complete header.
    ReadingHeader,
    /// A header announced `body_length` bytes; waiting for all of them.
    ReadingBody {
        /// Host-order body length taken from the header.
        body_length: usize,
    },
}

/// Outcome of a single [`FrameParser::feed`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Headers decoded during the call.
    pub headers: usize,
    /// Bodies consumed or discarded during the call.
    pub bodies: usize,
    /// True when the body handler declined a body and left it buffered.
    pub deferred: bool,
}

enum Step {
    Advanced,
    Waiting,
    Deferred,
}

/// Streaming parser for header-then-body framed data.
///
/// # Examples
///
/// ```
/// use ringframe::parser::{FrameParser, LengthPrefix, WireHeader};
///
/// let mut bodies = Vec::new();
/// let mut parser = FrameParser::new(
///     |header: &LengthPrefix<u16>| header.body_length() > 0,
///     |body: &[u8]| {
///         bodies.push(body.to_vec());
///         true
///     },
/// );
///
/// assert!(parser.handle_data(&[0x00, 0x03, b'a']));
/// assert!(parser.handle_data(b"bc"));
/// drop(parser);
/// assert_eq!(bodies, [b"abc".to_vec()]);
/// ```
pub struct FrameParser<H, HH, BH> {
    store: RingStore,
    state: ParserState,
    header: Option<H>,
    header_scratch: Vec<u8>,
    discard_body: bool,
    rejected_headers: RejectedHeaderPolicy,
    header_handler: HH,
    body_handler: BH,
}

impl<H, HH, BH> FrameParser<H, HH, BH>
where
    H: WireHeader,
    HH: FnMut(&H) -> bool,
    BH: FnMut(&[u8]) -> bool,
{
    /// Create a parser backed by a store of the default capacity.
    #[must_use]
    pub fn new(header_handler: HH, body_handler: BH) -> Self {
        Self::from_parts(
            RingStore::default(),
            RejectedHeaderPolicy::default(),
            header_handler,
            body_handler,
        )
    }

    /// Create a parser from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the configured capacity is invalid.
    pub fn with_config(
        config: &ParserConfig,
        header_handler: HH,
        body_handler: BH,
    ) -> Result<Self, CapacityError> {
        let store = config.build_store()?;
        Ok(Self::from_parts(
            store,
            config.rejected_headers,
            header_handler,
            body_handler,
        ))
    }

    fn from_parts(
        store: RingStore,
        rejected_headers: RejectedHeaderPolicy,
        header_handler: HH,
        body_handler: BH,
    ) -> Self {
        const {
            assert!(
                H::SIZE > 0 && H::LENGTH_OFFSET + <H::Length as LengthField>::WIDTH <= H::SIZE,
                "header length field must lie within the header"
            );
        }
        Self {
            store,
            state: ParserState::ReadingHeader,
            header: None,
            header_scratch: vec![0u8; H::SIZE],
            discard_body: false,
            rejected_headers,
            header_handler,
            body_handler,
        }
    }

    /// Feed a chunk of the stream and run every transition it enables.
    ///
    /// Returns `false` only when the chunk does not fit in the store's free
    /// space; the chunk is then dropped whole and previously buffered bytes
    /// are untouched. Returns `true` otherwise, however many frames were
    /// completed.
    pub fn handle_data(&mut self, data: &[u8]) -> bool { self.feed(data).is_ok() }

    /// Structured form of [`handle_data`](Self::handle_data).
    ///
    /// An empty chunk buffers nothing but still drives the state machine,
    /// which lets a caller retry a body its handler previously deferred.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BufferOverflow`] if `data` exceeds the free
    /// space. No bytes from `data` are admitted in that case.
    pub fn feed(&mut self, data: &[u8]) -> Result<Progress, StoreError> {
        match self.store.write(data) {
            Ok(()) | Err(StoreError::InvalidParameter) => {}
            Err(err) => {
                warn!(
                    requested = data.len(),
                    buffered = self.store.len(),
                    capacity = self.store.capacity(),
                    "frame parser rejected chunk: {err}"
                );
                metrics::inc_overflows();
                return Err(err);
            }
        }

        let mut progress = Progress::default();
        while self.ready() {
            match self.step(&mut progress) {
                Step::Advanced => {}
                Step::Waiting => break,
                Step::Deferred => {
                    progress.deferred = true;
                    break;
                }
            }
        }
        Ok(progress)
    }

    fn ready(&self) -> bool {
        let buffered = self.store.len();
        match self.state {
            ParserState::ReadingHeader => buffered >= H::SIZE,
            ParserState::ReadingBody { body_length } => buffered >= body_length,
        }
    }

    fn step(&mut self, progress: &mut Progress) -> Step {
        match self.state {
            ParserState::ReadingHeader => self.read_header(progress),
            ParserState::ReadingBody { body_length } => self.read_body(body_length, progress),
        }
    }

    fn read_header(&mut self, progress: &mut Progress) -> Step {
        if self.store.len() < H::SIZE {
            return Step::Waiting;
        }
        let read = self.store.read(&mut self.header_scratch);
        debug_assert_eq!(read, H::SIZE);

        let raw = self.header_scratch.as_slice();
        let length = H::Length::from_network(&raw[H::LENGTH_OFFSET..]);
        let header = H::from_wire(raw, length);
        let body_length = length.to_usize();

        let accepted = (self.header_handler)(&header);
        if !accepted {
            debug!(
                body_length,
                policy = self.rejected_headers.as_str(),
                "header handler rejected frame header"
            );
        }
        self.discard_body = !accepted && self.rejected_headers == RejectedHeaderPolicy::Discard;
        if body_length > self.store.capacity() {
            warn!(
                body_length,
                capacity = self.store.capacity(),
                "frame body can never fit in the ring store"
            );
        }

        self.header = Some(header);
        self.state = ParserState::ReadingBody { body_length };
        progress.headers += 1;
        metrics::inc_frames(FramePart::Header);
        trace!(body_length, "frame header decoded");
        Step::Advanced
    }

    fn read_body(&mut self, body_length: usize, progress: &mut Progress) -> Step {
        if self.store.len() < body_length {
            return Step::Waiting;
        }

        let consumed = if self.discard_body {
            self.store.drain(body_length);
            true
        } else if body_length == 0 {
            (self.body_handler)(&[])
        } else {
            let handler = &mut self.body_handler;
            self.store.read_with(body_length, |body| handler(body)) == body_length
        };

        if !consumed {
            debug!(body_length, "body handler deferred frame body");
            metrics::inc_deferrals();
            return Step::Deferred;
        }

        if self.discard_body {
            trace!(body_length, "discarded body of rejected header");
        } else {
            trace!(body_length, "frame body delivered");
        }
        self.state = ParserState::ReadingHeader;
        self.header = None;
        self.discard_body = false;
        progress.bodies += 1;
        metrics::inc_frames(FramePart::Body);
        Step::Advanced
    }
}

impl<H, HH, BH> FrameParser<H, HH, BH> {
    /// Current phase of the state machine.
    #[must_use]
    pub fn state(&self) -> ParserState { self.state }

    /// Body length still awaited, or zero while reading a header.
    #[must_use]
    pub fn pending_body_length(&self) -> usize {
        match self.state {
            ParserState::ReadingHeader => 0,
            ParserState::ReadingBody { body_length } => body_length,
        }
    }

    /// Header whose body is awaited, if any.
    #[must_use]
    pub fn current_header(&self) -> Option<&H> { self.header.as_ref() }

    /// Bytes buffered but not yet parsed into a header or body.
    #[must_use]
    pub fn buffered(&self) -> usize { self.store.len() }

    /// The parser's ring store.
    #[must_use]
    pub fn store(&self) -> &RingStore { &self.store }

    /// Drop all buffered bytes and return to reading a header.
    pub fn reset(&mut self) {
        self.store.clear();
        self.state = ParserState::ReadingHeader;
        self.header = None;
        self.discard_body = false;
    }
}

impl<H, HH, BH> fmt::Debug for FrameParser<H, HH, BH> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameParser")
            .field("state", &self.state)
            .field("rejected_headers", &self.rejected_headers)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
