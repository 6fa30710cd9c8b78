//! Lumen lamp protocol - advertising frame codec.
//!
//! Lumen lamps listen for commands broadcast in plain BLE advertisements:
//! no connection, no pairing, one-way and best-effort. A command travels as
//! a 25-byte frame that is checksummed, bit-reversed, whitened with a
//! fixed-seed LFSR and then repackaged as a list of 16-bit "UUIDs" inside a
//! standard GAP advertising-data blob.
//!
//! This crate is the pure codec: bytes in, bytes out, no radio I/O. The
//! `lumen-ble` binary owns the HCI side.

pub mod adv;
pub mod crc;
pub mod frame;
pub mod whitening;

/// Command codes carried at frame offset 11.
pub mod commands {
    /// Pair with a lamp; args repeat the lamp identifier
    pub const SETUP: u8 = 0x28;

    /// Power on
    pub const ON: u8 = 0x10;

    /// Power off
    pub const OFF: u8 = 0x11;

    /// Set brightness; arg0 = cold channel, arg1 = warm channel
    pub const BRIGHTNESS: u8 = 0x21;
}

/// Brightness byte per level. Index 0 is the "no argument" sentinel and is
/// never reachable through [`level_byte`]; levels 1..=10 map to increasing
/// non-linear output levels.
pub const BRIGHTNESS_LEVELS: [u8; 11] = [
    0x00, 0x1A, 0x33, 0x4C, 0x66, 0x7F, 0x99, 0xB2, 0xCC, 0xE5, 0xFF,
];

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("brightness level {0} out of range (expected 1 to 10)")]
    OutOfRange(u8),
}

/// Map a user-facing brightness level (1..=10) to its argument byte.
pub fn level_byte(level: u8) -> Result<u8, LevelError> {
    if !(1..=10).contains(&level) {
        return Err(LevelError::OutOfRange(level));
    }
    Ok(BRIGHTNESS_LEVELS[level as usize])
}

/// Encode one command into the full advertising-data blob.
///
/// Pipeline: build the frame, reverse bits, whiten, packetize into 16-bit
/// elements, then assemble two AD structures - flags (limited discoverable)
/// and the complete 16-bit UUID list carrying the frame. The result is the
/// 30-byte blob handed to the radio for a single broadcast.
pub fn encode(name: &str, command: u8, arg0: u8, arg1: u8) -> Result<Vec<u8>, adv::AdvError> {
    encode_with_nonce(name, command, arg0, arg1, rand::random())
}

/// [`encode`] with a caller-supplied nonce, for deterministic output.
pub fn encode_with_nonce(
    name: &str,
    command: u8,
    arg0: u8,
    arg1: u8,
    nonce: u8,
) -> Result<Vec<u8>, adv::AdvError> {
    let frame = frame::build_with_nonce(name, command, arg0, arg1, nonce);
    let whitened = whitening::whiten(&whitening::reverse_bits(&frame));
    let elements = adv::packetize(&whitened);

    let mut data = adv::AdvertisingData::new();
    data.push(
        adv::gap::FLAGS,
        adv::AdPayload::Raw(&[adv::gap::LE_LIMITED_DISCOVERABLE]),
    )?;
    data.push(adv::gap::UUID16_COMPLETE, adv::AdPayload::Elements(&elements))?;
    Ok(data.into_bytes())
}
