//! Command line interface for the `ringframe` binary.
//!
//! The binary replays a recorded length-prefixed stream through a
//! `FrameParser`, delivering it in fixed-size chunks the way a socket would.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Parser, ValueEnum};

/// Width of the big-endian length prefix in front of each body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrefixWidth {
    /// Two-byte prefix.
    #[value(name = "16")]
    U16,
    /// Four-byte prefix.
    #[value(name = "32")]
    U32,
}

/// Command line arguments for the `ringframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ringframe",
    version,
    about = "Split a length-prefixed byte stream into frames"
)]
pub struct Cli {
    /// Recorded stream to replay. Reads standard input when omitted.
    pub input: Option<PathBuf>,

    /// Ring store capacity in bytes. Must be a power of two.
    #[arg(short, long, default_value_t = 2048)]
    pub capacity: usize,

    /// Bytes handed to the parser per call.
    #[arg(short = 's', long, default_value = "512")]
    pub chunk_size: NonZeroUsize,

    /// Width of the length prefix in bits.
    #[arg(short, long, value_enum, default_value_t = PrefixWidth::U32)]
    pub width: PrefixWidth,

    /// Print every body as hex.
    #[arg(long)]
    pub hex: bool,
}
