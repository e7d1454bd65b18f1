//! Network byte-order conversions for header length fields.
//!
//! A [`WireHeader`](crate::parser::WireHeader) carries its body length
//! big-endian at a fixed offset. The parser copies those bytes out of the
//! header scratch buffer and decodes them here before the header handler ever
//! sees the value, so handlers only deal with host order.
//!
//! # Examples
//!
//! Decoding the 32-bit length at offset 4 of a ten-byte header:
//!
//! ```
//! use ringframe::byte_order::{read_network_u32, write_network_u32};
//!
//! let mut header = [0xAA, 0x55, 0xBB, 0x55, 0, 0, 0, 0, 0xFF, 0xFF];
//! header[4..8].copy_from_slice(&write_network_u32(100));
//! assert_eq!(&header[4..8], &[0x00, 0x00, 0x00, 0x64]);
//!
//! let mut field = [0u8; 4];
//! field.copy_from_slice(&header[4..8]);
//! assert_eq!(read_network_u32(field), 100);
//! ```

macro_rules! length_codec {
    ($ty:ty, $width:literal, $write:ident, $read:ident) => {
        #[doc = concat!("Encode a `", stringify!($ty), "` length field for the wire.")]
        #[must_use]
        pub fn $write(length: $ty) -> [u8; $width] {
            #[expect(
                clippy::big_endian_bytes,
                reason = "Length fields are transmitted in network order."
            )]
            length.to_be_bytes()
        }

        #[doc = concat!("Decode a `", stringify!($ty), "` length field taken off the wire.")]
        #[must_use]
        pub fn $read(field: [u8; $width]) -> $ty {
            #[expect(
                clippy::big_endian_bytes,
                reason = "Length fields are transmitted in network order."
            )]
            <$ty>::from_be_bytes(field)
        }
    };
}

length_codec!(u16, 2, write_network_u16, read_network_u16);
length_codec!(u32, 4, write_network_u32, read_network_u32);
