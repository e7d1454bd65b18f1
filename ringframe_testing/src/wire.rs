//! Builders for framed byte streams and helpers for fragmenting them.

use bytes::{BufMut, BytesMut};
use ringframe::{LengthField, LengthPrefix};

use crate::DemoHeader;

/// Encode one [`DemoHeader`] frame carrying `body`.
///
/// # Panics
///
/// Panics if `body` is longer than `u32::MAX` bytes.
#[must_use]
pub fn demo_frame(msg_type: u16, body: &[u8]) -> Vec<u8> {
    let length = u32::try_from(body.len()).expect("body length fits in u32");
    let mut buf = BytesMut::with_capacity(DemoHeader::ENCODED_LEN + body.len());
    buf.put_slice(&DemoHeader::new(msg_type, length).encode());
    buf.put_slice(body);
    buf.to_vec()
}

/// Concatenate [`demo_frame`]s, numbering message types from zero.
///
/// # Panics
///
/// Panics if there are more than `u16::MAX` bodies.
#[must_use]
pub fn demo_stream(bodies: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    for (index, body) in bodies.iter().enumerate() {
        let msg_type = u16::try_from(index).expect("message index fits in u16");
        buf.put_slice(&demo_frame(msg_type, body));
    }
    buf.to_vec()
}

/// Encode `body` behind a bare big-endian length prefix.
///
/// # Panics
///
/// Panics if `body` does not fit in `L`.
#[must_use]
pub fn prefixed_frame<L>(body: &[u8]) -> Vec<u8>
where
    L: LengthField + TryFrom<usize>,
{
    let Ok(length) = L::try_from(body.len()) else {
        panic!("body of {} bytes does not fit the prefix", body.len());
    };
    let mut wire = LengthPrefix::new(length).encode();
    wire.extend_from_slice(body);
    wire
}

/// Split `wire` at each offset in `points`, which must be ascending.
///
/// Offsets past the end are clamped, so the chunks always cover `wire`
/// exactly once. Empty chunks are kept.
#[must_use]
pub fn split_at<'a>(wire: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for &point in points {
        let end = point.clamp(start, wire.len());
        chunks.push(&wire[start..end]);
        start = end;
    }
    chunks.push(&wire[start..]);
    chunks
}

/// Deliver `wire` one byte at a time.
pub fn byte_by_byte(wire: &[u8]) -> impl Iterator<Item = &[u8]> { wire.chunks(1) }
