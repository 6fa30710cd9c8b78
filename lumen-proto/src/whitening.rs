//! Bit-reversal and data-whitening transforms.
//!
//! A real BLE radio transmits every byte LSB-first and whitens the packet
//! with a channel-seeded 7-bit LFSR. Because the frame here travels inside
//! an ordinary advertising payload, both transforms are applied up front so
//! the bytes come out right on the air: first mirror the bit order of each
//! byte, then XOR with the keystream of a fixed-seed LFSR.

/// Initial LFSR state: the low 7 bits of -7.
const LFSR_INIT: u8 = 0x79;

/// Mirror the bit order within every byte (bit 0 becomes bit 7 and so on).
///
/// Its own inverse for any input.
pub fn reverse_bits(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| b.reverse_bits()).collect()
}

/// XOR `data` with the keystream of a 7-bit LFSR seeded with [`LFSR_INIT`].
///
/// The register state carries over between bytes within one call and is
/// reset at the start of every call, so `whiten(&whiten(x)) == x`.
///
/// Unlike the BLE link layer, the seed never varies: the codec does not
/// control the advertising channel, so there is nothing to derive it from.
pub fn whiten(data: &[u8]) -> Vec<u8> {
    let mut lfsr = LFSR_INIT;
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        let mut key = 0u8;
        for _ in 0..8 {
            // Bit 6 of the register is the next keystream bit; the first
            // bit produced lands in bit 0 of the key byte.
            key >>= 1;
            key |= (lfsr & 0x40) << 1;

            // Advance the register: feedback is the bit shifted out of the
            // 7-bit window, injected at bit 0 and XORed into bit 4.
            lfsr <<= 1;
            let feedback = (lfsr & 0x80) >> 7;
            let tap = ((lfsr & 0x10) >> 4) ^ feedback;
            lfsr |= feedback;
            lfsr = (lfsr & !0x10) | (tap << 4);
            lfsr &= 0x7F;
        }
        out.push(byte ^ key);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_single_bits() {
        assert_eq!(reverse_bits(&[0x01]), [0x80]);
        assert_eq!(reverse_bits(&[0xF0]), [0x0F]);
        assert_eq!(reverse_bits(&[0x00]), [0x00]);
        assert_eq!(reverse_bits(&[0xFF]), [0xFF]);
    }

    #[test]
    fn reverse_is_involution() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(reverse_bits(&reverse_bits(&data)), data);
    }

    #[test]
    fn keystream_head() {
        // Whitening all-zero input exposes the raw keystream.
        let ks = whiten(&[0x00; 4]);
        assert_eq!(ks, [0x77, 0xF8, 0xE3, 0x46]);
    }

    #[test]
    fn whiten_is_involution() {
        let data: Vec<u8> = (0..25).map(|i| (i * 37) as u8).collect();
        assert_eq!(whiten(&whiten(&data)), data);
    }

    #[test]
    fn state_resets_between_calls() {
        let a = whiten(&[0xAB, 0xCD]);
        let b = whiten(&[0xAB, 0xCD]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input() {
        assert!(whiten(&[]).is_empty());
        assert!(reverse_bits(&[]).is_empty());
    }
}
