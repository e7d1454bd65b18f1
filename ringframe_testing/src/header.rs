//! Sample protocol header used across the integration tests.

use ringframe::{
    WireHeader,
    byte_order::{read_network_u16, write_network_u16, write_network_u32},
};

/// Ten-byte header: two flag words, a 32-bit body length and a message type.
///
/// Every field is carried in network order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoHeader {
    /// First flag word.
    pub flag0: u16,
    /// Second flag word.
    pub flag1: u16,
    /// Declared body length.
    pub body_length: u32,
    /// Application message type.
    pub msg_type: u16,
}

impl DemoHeader {
    /// Flag pattern written by [`DemoHeader::new`].
    pub const FLAGS: (u16, u16) = (0xAA55, 0xBB55);

    /// Encoded size in bytes.
    pub const ENCODED_LEN: usize = 10;

    /// Header announcing `body_length` bytes of type `msg_type`.
    #[must_use]
    pub fn new(msg_type: u16, body_length: u32) -> Self {
        Self {
            flag0: Self::FLAGS.0,
            flag1: Self::FLAGS.1,
            body_length,
            msg_type,
        }
    }

    /// Encode the header in network order.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..2].copy_from_slice(&write_network_u16(self.flag0));
        out[2..4].copy_from_slice(&write_network_u16(self.flag1));
        out[4..8].copy_from_slice(&write_network_u32(self.body_length));
        out[8..10].copy_from_slice(&write_network_u16(self.msg_type));
        out
    }
}

fn word(raw: &[u8], at: usize) -> u16 { read_network_u16([raw[at], raw[at + 1]]) }

impl WireHeader for DemoHeader {
    type Length = u32;

    const SIZE: usize = Self::ENCODED_LEN;
    const LENGTH_OFFSET: usize = 4;

    fn from_wire(raw: &[u8], body_length: u32) -> Self {
        Self {
            flag0: word(raw, 0),
            flag1: word(raw, 2),
            body_length,
            msg_type: word(raw, 8),
        }
    }

    fn body_length(&self) -> u32 { self.body_length }
}
