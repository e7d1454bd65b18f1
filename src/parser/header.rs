//! Header model for header-then-body framing.
//!
//! A [`WireHeader`] is a fixed-size record with exactly one designated length
//! field, either `u16` or `u32`, carried in network byte order. The parser
//! decodes that field itself so the header handler only ever observes host
//! order values.

use std::fmt;

use crate::byte_order::{read_network_u16, read_network_u32, write_network_u16, write_network_u32};

mod sealed {
    pub trait Sealed {}

    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// Integer widths permitted for a header's body-length field.
///
/// Implemented for `u16` and `u32` only.
pub trait LengthField: sealed::Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Decode the field from the first [`WIDTH`](Self::WIDTH) bytes of
    /// `wire`, converting from network order.
    ///
    /// # Panics
    ///
    /// Panics if `wire` is shorter than [`WIDTH`](Self::WIDTH).
    fn from_network(wire: &[u8]) -> Self;

    /// Encode the field into the first [`WIDTH`](Self::WIDTH) bytes of `out`
    /// in network order.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than [`WIDTH`](Self::WIDTH).
    fn to_network(self, out: &mut [u8]);

    /// Widen the value to a byte count.
    fn to_usize(self) -> usize;
}

impl LengthField for u16 {
    const WIDTH: usize = 2;

    fn from_network(wire: &[u8]) -> Self {
        let mut raw = [0u8; 2];
        raw.copy_from_slice(&wire[..2]);
        read_network_u16(raw)
    }

    fn to_network(self, out: &mut [u8]) { out[..2].copy_from_slice(&write_network_u16(self)); }

    fn to_usize(self) -> usize { usize::from(self) }
}

impl LengthField for u32 {
    const WIDTH: usize = 4;

    fn from_network(wire: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&wire[..4]);
        read_network_u32(raw)
    }

    fn to_network(self, out: &mut [u8]) { out[..4].copy_from_slice(&write_network_u32(self)); }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "Supported targets have at least 32-bit pointers."
    )]
    fn to_usize(self) -> usize { self as usize }
}

/// Fixed-size protocol header carrying a body length.
///
/// # Examples
///
/// ```
/// use ringframe::parser::WireHeader;
///
/// #[derive(Debug)]
/// struct TaggedHeader {
///     tag: u8,
///     body_length: u16,
/// }
///
/// impl WireHeader for TaggedHeader {
///     type Length = u16;
///
///     const SIZE: usize = 3;
///     const LENGTH_OFFSET: usize = 1;
///
///     fn from_wire(raw: &[u8], body_length: u16) -> Self {
///         Self {
///             tag: raw[0],
///             body_length,
///         }
///     }
///
///     fn body_length(&self) -> u16 { self.body_length }
/// }
/// ```
pub trait WireHeader: Sized {
    /// Width of the designated length field.
    type Length: LengthField;

    /// Encoded size of the header in bytes.
    const SIZE: usize;

    /// Byte offset of the length field within the encoded header.
    const LENGTH_OFFSET: usize;

    /// Build the header from its `SIZE` raw bytes.
    ///
    /// `body_length` has already been decoded from network order; the raw
    /// bytes at the length offset should be ignored.
    fn from_wire(raw: &[u8], body_length: Self::Length) -> Self;

    /// Host-order body length declared by this header.
    fn body_length(&self) -> Self::Length;
}

/// Header consisting of nothing but a big-endian length prefix.
///
/// # Examples
///
/// ```
/// use ringframe::parser::{LengthPrefix, WireHeader};
///
/// let header = LengthPrefix::<u16>::from_wire(&[0x01, 0x00], 0x0100);
/// assert_eq!(header.body_length(), 256);
/// assert_eq!(LengthPrefix::<u32>::SIZE, 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthPrefix<L> {
    body_length: L,
}

impl<L: LengthField> LengthPrefix<L> {
    /// Create a prefix announcing `body_length` bytes.
    #[must_use]
    pub fn new(body_length: L) -> Self { Self { body_length } }

    /// Encode the prefix in network order.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; L::WIDTH];
        self.body_length.to_network(&mut out);
        out
    }
}

impl<L: LengthField> WireHeader for LengthPrefix<L> {
    type Length = L;

    const SIZE: usize = L::WIDTH;
    const LENGTH_OFFSET: usize = 0;

    fn from_wire(_raw: &[u8], body_length: L) -> Self { Self::new(body_length) }

    fn body_length(&self) -> L { self.body_length }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{LengthField, LengthPrefix, WireHeader};

    #[rstest]
    #[case(&[0x00, 0x64], 100)]
    #[case(&[0xFF, 0xFF], 65_535)]
    fn u16_field_reads_network_order(#[case] wire: &[u8], #[case] expected: u16) {
        assert_eq!(u16::from_network(wire), expected);
    }

    #[test]
    fn u32_field_ignores_trailing_bytes() {
        assert_eq!(u32::from_network(&[0, 0, 0, 100, 0xAA]), 100);
    }

    #[test]
    fn prefix_encodes_big_endian() {
        assert_eq!(LengthPrefix::new(100u32).encode(), [0, 0, 0, 100]);
        assert_eq!(LengthPrefix::new(0x0102u16).encode(), [1, 2]);
    }

    #[test]
    fn prefix_layout_matches_width() {
        assert_eq!(LengthPrefix::<u16>::SIZE, 2);
        assert_eq!(LengthPrefix::<u32>::SIZE, 4);
        assert_eq!(LengthPrefix::<u32>::LENGTH_OFFSET, 0);
    }
}
