//! Replay a recorded stream through a [`FrameParser`].

use std::{
    cell::RefCell,
    io::{self, Read, Write},
    rc::Rc,
};

use ringframe::{CapacityError, FrameParser, LengthField, LengthPrefix, ParserConfig, WireHeader};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cli::{Cli, PrefixWidth};

/// Errors that stop a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading the input or writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested store capacity is unusable.
    #[error("invalid capacity: {0}")]
    Capacity(#[from] CapacityError),

    /// The store filled up without completing a frame part, so the pending
    /// part is larger than the store can ever hold.
    #[error("stream stalled at byte {offset}: {pending} bytes buffered, store capacity {capacity}")]
    Stalled {
        /// Stream offset of the first byte that could not be buffered.
        offset: u64,
        /// Bytes buffered when the chunk was rejected.
        pending: usize,
        /// Store capacity.
        capacity: usize,
    },
}

/// Totals reported once the input is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Frames delivered.
    pub frames: usize,
    /// Bytes left over after the last complete frame.
    pub trailing: usize,
}

/// Replay `input` according to `cli`, writing one line per frame to `out`.
///
/// # Errors
///
/// Returns [`ReplayError`] when I/O fails, the capacity is invalid, or a
/// frame cannot fit in the store.
pub fn run(cli: &Cli, input: &mut dyn Read, out: &mut dyn Write) -> Result<Summary, ReplayError> {
    let config = ParserConfig::default().capacity(cli.capacity);
    match cli.width {
        PrefixWidth::U16 => replay::<u16>(cli, &config, input, out),
        PrefixWidth::U32 => replay::<u32>(cli, &config, input, out),
    }
}

fn replay<L: LengthField>(
    cli: &Cli,
    config: &ParserConfig,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<Summary, ReplayError> {
    let bodies: Rc<RefCell<Vec<Vec<u8>>>> = Rc::default();
    let sink = Rc::clone(&bodies);
    let mut parser = FrameParser::with_config(
        config,
        |header: &LengthPrefix<L>| {
            debug!(body_length = header.body_length().to_usize(), "frame header");
            true
        },
        move |body: &[u8]| {
            sink.borrow_mut().push(body.to_vec());
            true
        },
    )?;

    let mut chunk = vec![0u8; cli.chunk_size.get()];
    let mut offset = 0u64;
    let mut summary = Summary::default();
    loop {
        let read = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        // Slices never exceed the free space, so the store only refuses
        // input once it is full and the parser still cannot advance.
        let mut rest = &chunk[..read];
        while !rest.is_empty() {
            let room = parser.store().remaining();
            let take = room.min(rest.len());
            if take == 0 || !parser.handle_data(&rest[..take]) {
                return Err(ReplayError::Stalled {
                    offset,
                    pending: parser.buffered(),
                    capacity: parser.store().capacity(),
                });
            }
            offset += take as u64;
            rest = &rest[take..];

            for body in bodies.borrow_mut().drain(..) {
                summary.frames += 1;
                report(out, summary.frames, &body, cli.hex)?;
            }
        }
    }

    summary.trailing = parser.buffered();
    if summary.trailing > 0 {
        warn!(
            trailing = summary.trailing,
            "input ended inside a frame; partial frame dropped"
        );
    }
    Ok(summary)
}

fn report(out: &mut dyn Write, index: usize, body: &[u8], hex: bool) -> io::Result<()> {
    if !hex {
        return writeln!(out, "frame {index}: {} bytes", body.len());
    }
    let rendered = body
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "frame {index}: {} bytes: {rendered}", body.len())
}
