//! CRC-16/CCITT-FALSE, used both for the lamp identifier and the frame
//! checksum.

/// CRC-16/CCITT-FALSE polynomial
const POLYNOMIAL: u16 = 0x1021;

/// Initial register value
const INITIAL: u16 = 0xFFFF;

/// Compute CRC-16/CCITT-FALSE over `data`.
///
/// Polynomial 0x1021, initial value 0xFFFF, no input or output reflection.
/// The canonical check value is `checksum(b"123456789") == 0x29B1`.
pub fn checksum(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Compute the checksum and return it as a big-endian byte pair, the order
/// it is written into the command frame.
pub fn checksum_bytes(data: &[u8]) -> [u8; 2] {
    checksum(data).to_be_bytes()
}

/// Derive the 2-byte lamp identifier from the lamp's name.
///
/// The identifier is the checksum of the UTF-8 encoding of the name.
/// Receivers use it to filter commands addressed to them, so the same name
/// must always produce the same identifier. Any name is accepted, including
/// the empty string; distinct names collide only on a 16-bit CRC collision.
pub fn lamp_id(name: &str) -> [u8; 2] {
    checksum_bytes(name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        // CRC-16/CCITT-FALSE reference check value
        assert_eq!(checksum(b"123456789"), 0x29B1);
    }

    #[test]
    fn empty_input() {
        assert_eq!(checksum(b""), 0xFFFF);
    }

    #[test]
    fn big_endian_bytes() {
        assert_eq!(checksum_bytes(b"123456789"), [0x29, 0xB1]);
    }

    #[test]
    fn lamp_id_is_reproducible() {
        assert_eq!(lamp_id("Lamp1"), [0x53, 0x38]);
        assert_eq!(lamp_id("Lamp1"), lamp_id("Lamp1"));
    }

    #[test]
    fn distinct_names_distinct_ids() {
        assert_ne!(lamp_id("Lamp1"), lamp_id("Lamp2"));
        assert_eq!(lamp_id("Lamp2"), [0x63, 0x5B]);
    }

    #[test]
    fn empty_name_is_valid() {
        assert_eq!(lamp_id(""), [0xFF, 0xFF]);
    }
}
