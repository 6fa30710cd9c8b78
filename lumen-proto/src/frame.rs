//! Command frame construction.
//!
//! Layout of the 25-byte frame (offsets fixed by the lamp firmware):
//!
//! ```text
//! [0..11]   preamble (protocol magic)
//! [11]      command code
//! [12..14]  lamp identifier, big-endian CRC of the lamp name
//! [14]      arg0
//! [15]      arg1
//! [16]      marker 0x83
//! [17]      nonce, one fresh random byte per frame
//! [18..23]  reserved, five zero bytes
//! [23..25]  CRC-16/CCITT-FALSE over [11..23], big-endian
//! ```

use crate::crc;

/// Total frame length in bytes.
pub const FRAME_LEN: usize = 25;

/// Protocol magic preceding every command.
pub const PREAMBLE: [u8; 11] = [
    0x71, 0x0F, 0x55, 0xAA, 0x98, 0x43, 0xAF, 0x0B, 0x46, 0x46, 0x46,
];

/// Constant marker byte at offset 16.
pub const MARKER: u8 = 0x83;

const COMMAND: usize = 11;
const LAMP_ID: usize = 12;
const ARG0: usize = 14;
const ARG1: usize = 15;
const MARKER_AT: usize = 16;
const NONCE: usize = 17;
const CHECKSUM: usize = 23;
const CHECKSUM_SPAN: std::ops::Range<usize> = COMMAND..CHECKSUM;

/// Build a command frame with a fresh random nonce.
///
/// The nonce defeats duplicate-packet suppression in receivers and sniffers;
/// it carries no other meaning and needs no cryptographic quality.
pub fn build(name: &str, command: u8, arg0: u8, arg1: u8) -> [u8; FRAME_LEN] {
    build_with_nonce(name, command, arg0, arg1, rand::random())
}

/// Build a command frame with the given nonce byte.
///
/// Fully deterministic; the frame is a pure function of its arguments.
pub fn build_with_nonce(
    name: &str,
    command: u8,
    arg0: u8,
    arg1: u8,
    nonce: u8,
) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[..PREAMBLE.len()].copy_from_slice(&PREAMBLE);
    frame[COMMAND] = command;

    let id = crc::lamp_id(name);
    frame[LAMP_ID] = id[0];
    frame[LAMP_ID + 1] = id[1];

    frame[ARG0] = arg0;
    frame[ARG1] = arg1;
    frame[MARKER_AT] = MARKER;
    frame[NONCE] = nonce;
    // [18..23] stay zero

    let sum = crc::checksum_bytes(&frame[CHECKSUM_SPAN]);
    frame[CHECKSUM] = sum[0];
    frame[CHECKSUM + 1] = sum[1];
    frame
}
