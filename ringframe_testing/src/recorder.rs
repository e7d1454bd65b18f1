//! Recording handlers for [`FrameParser`].

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use ringframe::{CapacityError, FrameParser, ParserConfig};

use crate::DemoHeader;

/// Parser over [`DemoHeader`] frames whose handlers feed a [`FrameLog`].
pub type LoggedParser = FrameParser<
    DemoHeader,
    Box<dyn FnMut(&DemoHeader) -> bool>,
    Box<dyn FnMut(&[u8]) -> bool>,
>;

/// Shared record of every header and body a parser delivered.
///
/// Clones share the same record, so a test can keep one handle while the
/// parser owns another.
#[derive(Clone, Debug, Default)]
pub struct FrameLog {
    headers: Rc<RefCell<Vec<DemoHeader>>>,
    bodies: Rc<RefCell<Vec<Vec<u8>>>>,
    declines: Rc<Cell<usize>>,
}

impl FrameLog {
    /// Build a parser with a store of `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a non-zero power of two.
    #[must_use]
    pub fn parser(&self, capacity: usize) -> LoggedParser {
        self.parser_with(&ParserConfig::default().capacity(capacity))
            .expect("test capacity must be a power of two")
    }

    /// Build a parser from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] when the configured capacity is invalid.
    pub fn parser_with(&self, config: &ParserConfig) -> Result<LoggedParser, CapacityError> {
        let headers = Rc::clone(&self.headers);
        let bodies = Rc::clone(&self.bodies);
        let declines = Rc::clone(&self.declines);
        let on_header: Box<dyn FnMut(&DemoHeader) -> bool> =
            Box::new(move |header: &DemoHeader| {
                headers.borrow_mut().push(*header);
                true
            });
        let on_body: Box<dyn FnMut(&[u8]) -> bool> = Box::new(move |body: &[u8]| {
            let pending = declines.get();
            if pending > 0 {
                declines.set(pending - 1);
                return false;
            }
            bodies.borrow_mut().push(body.to_vec());
            true
        });
        FrameParser::with_config(config, on_header, on_body)
    }

    /// Make the body handler decline the next `count` bodies it is offered.
    pub fn decline_next_bodies(&self, count: usize) { self.declines.set(count); }

    /// Headers delivered so far, in order.
    #[must_use]
    pub fn headers(&self) -> Vec<DemoHeader> { self.headers.borrow().clone() }

    /// Bodies delivered so far, in order.
    #[must_use]
    pub fn bodies(&self) -> Vec<Vec<u8>> { self.bodies.borrow().clone() }
}
