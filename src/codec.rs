//! Byte-level encodings shared by every [`RandomAccess`](crate::RandomAccess)
//! implementation.
//!
//! Numbers are big-endian. Text is walked as UTF-16 code units, and the
//! length-prefixed string format is "modified UTF-8": NUL takes two bytes and
//! each surrogate of a supplementary character is encoded on its own.

use crate::{Result, error::StoreError};

/// Largest payload a 16-bit length prefix can describe.
pub const MAX_MODIFIED_UTF8_LEN: usize = u16::MAX as usize;

/// Number of bytes `s` occupies in modified UTF-8, excluding the length prefix.
pub fn modified_utf8_len(s: &str) -> usize {
    s.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            _ => 3,
        })
        .sum()
}

/// Encodes `s` as a big-endian `u16` byte count followed by its modified-UTF-8 bytes.
pub fn encode_modified_utf8(s: &str) -> Result<Vec<u8>> {
    let len = modified_utf8_len(s);
    if len > MAX_MODIFIED_UTF8_LEN {
        return Err(StoreError::StringTooLong(len));
    }

    let mut out = Vec::with_capacity(len + 2);
    out.extend_from_slice(&(len as u16).to_be_bytes());
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    Ok(out)
}

/// Decodes a modified-UTF-8 payload (without its length prefix).
///
/// Errors carry the offset within `bytes` where decoding failed.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let lead = bytes[i];
        match lead >> 4 {
            0x0..=0x7 => {
                units.push(u16::from(lead));
                i += 1;
            }
            0xC | 0xD => {
                let second = *bytes.get(i + 1).ok_or(StoreError::MalformedUtf8(i))?;
                if !is_continuation(second) {
                    return Err(StoreError::MalformedUtf8(i + 2));
                }
                units.push((u16::from(lead & 0x1F) << 6) | u16::from(second & 0x3F));
                i += 2;
            }
            0xE => {
                let (second, third) = match (bytes.get(i + 1), bytes.get(i + 2)) {
                    (Some(&b2), Some(&b3)) => (b2, b3),
                    _ => return Err(StoreError::MalformedUtf8(i)),
                };
                if !is_continuation(second) || !is_continuation(third) {
                    return Err(StoreError::MalformedUtf8(i + 2));
                }
                units.push(
                    (u16::from(lead & 0x0F) << 12)
                        | (u16::from(second & 0x3F) << 6)
                        | u16::from(third & 0x3F),
                );
                i += 3;
            }
            _ => return Err(StoreError::MalformedUtf8(i)),
        }
    }

    // Lone surrogates decode fine above but have no `String` form.
    String::from_utf16(&units).map_err(|_| StoreError::MalformedUtf8(bytes.len()))
}

/// Low 8 bits of every UTF-16 code unit of `s`.
pub fn latin1_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().map(|unit| unit as u8).collect()
}

/// Every UTF-16 code unit of `s`, big-endian.
pub fn utf16_be_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

fn is_continuation(byte: u8) -> bool { byte & 0xC0 == 0x80 }
