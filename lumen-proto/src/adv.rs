//! GAP advertising-data packaging.
//!
//! The whitened frame is smuggled to the lamp inside a "complete list of
//! 16-bit service UUIDs" AD structure. The entries are not UUIDs in any
//! meaningful sense, just 2-byte windows over the frame; the lamp firmware
//! reads them back out of the advertisement in order.

/// Hard BLE limit on the serialized advertising data, all structures
/// included.
pub const ADV_DATA_MAX: usize = 31;

/// GAP AD type tags and flag bits.
pub mod gap {
    /// Flags AD type
    pub const FLAGS: u8 = 0x01;

    /// Complete list of 16-bit service UUIDs
    pub const UUID16_COMPLETE: u8 = 0x03;

    /// LE Limited Discoverable Mode flag bit
    pub const LE_LIMITED_DISCOVERABLE: u8 = 0x01;
}

/// One entry of a 16-bit UUID list.
///
/// `Tail` is the defensive odd-length case: the 25-byte frame always leaves
/// one byte over, and it is carried as-is rather than padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdElement {
    Pair([u8; 2]),
    Tail(u8),
}

impl AdElement {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AdElement::Pair(bytes) => bytes,
            AdElement::Tail(byte) => std::slice::from_ref(byte),
        }
    }
}

/// Split `data` into consecutive 2-byte elements, preserving order.
///
/// An odd-length input produces a final 1-byte [`AdElement::Tail`]; nothing
/// is ever padded or dropped.
pub fn packetize(data: &[u8]) -> Vec<AdElement> {
    let mut out = Vec::with_capacity(data.len().div_ceil(2));
    let mut chunks = data.chunks_exact(2);
    for chunk in chunks.by_ref() {
        out.push(AdElement::Pair([chunk[0], chunk[1]]));
    }
    if let &[last] = chunks.remainder() {
        out.push(AdElement::Tail(last));
    }
    out
}

/// Payload of one AD structure, shaped by the caller.
///
/// The caller states whether it is handing over packetized elements or a
/// flat run of bytes; the assembler never guesses from the data.
#[derive(Debug, Clone, Copy)]
pub enum AdPayload<'a> {
    /// Homogeneous elements from [`packetize`], concatenated in order.
    Elements(&'a [AdElement]),
    /// Raw payload bytes, e.g. the flags byte.
    Raw(&'a [u8]),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdvError {
    #[error("advertising data too long ({len} bytes, limit is 31)")]
    TooLong { len: usize },
}

/// Accumulates AD structures into the advertising-data blob.
///
/// Each pushed structure is framed as `[1 + payload_len, tag, payload...]`.
/// The 31-byte BLE ceiling is enforced on every push; a structure that does
/// not fit is rejected whole, never truncated.
#[derive(Debug, Default)]
pub struct AdvertisingData {
    data: Vec<u8>,
    tags: std::collections::BTreeMap<u8, Vec<u8>>,
}

impl AdvertisingData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one AD structure.
    pub fn push(&mut self, tag: u8, payload: AdPayload<'_>) -> Result<&mut Self, AdvError> {
        let mut body = Vec::new();
        match payload {
            AdPayload::Elements(elements) => {
                for element in elements {
                    body.extend_from_slice(element.as_bytes());
                }
            }
            AdPayload::Raw(bytes) => body.extend_from_slice(bytes),
        }

        let len = self.data.len() + 2 + body.len();
        if len > ADV_DATA_MAX {
            return Err(AdvError::TooLong { len });
        }

        self.data.push((1 + body.len()) as u8);
        self.data.push(tag);
        self.data.extend_from_slice(&body);
        self.tags.insert(tag, body);
        Ok(self)
    }

    /// The serialized advertising data, all structures concatenated.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Payload recorded for `tag`, for introspection in tests and logs.
    pub fn payload_for(&self, tag: u8) -> Option<&[u8]> {
        self.tags.get(&tag).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
