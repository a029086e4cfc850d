use crate::{Result, codec, error::StoreError};

/// The random-access file contract: a byte sequence with a cursor.
///
/// Implementors supply the primitive operations; every typed and convenience
/// operation is provided on top of them, so an in-memory fake and a
/// disk-backed file agree byte-for-byte on every encoding.
///
/// Positions are accepted as `i64` so that negative requests can be rejected
/// rather than being unrepresentable. End of data on the raw reads is `None`;
/// typed and "fully" reads that run out of bytes fail with
/// [`StoreError::EndOfData`] instead.
///
/// Every operation fails with [`StoreError::Closed`] while the store is closed.
pub trait RandomAccess {
    /// Fails with [`StoreError::Closed`] unless the store is open.
    fn ensure_open(&self) -> Result<()>;

    /// Reads the byte under the cursor and advances past it.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Copies up to `len` bytes into `dst[off..off + len]`.
    ///
    /// Returns the number of bytes copied, or `None` if nothing could be read.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Bounds` if `off + len` exceeds `dst.len()`.
    fn read_range(&mut self, dst: &mut [u8], off: usize, len: usize) -> Result<Option<usize>>;

    /// Stores `value` under the cursor and advances past it, growing the store if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PositionOverflow` if growing would pass the addressable range.
    fn write_byte(&mut self, value: u8) -> Result<()>;

    /// Copies `src[off..off + len]` to the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Bounds` if `off + len` exceeds `src.len()` and
    /// `StoreError::PositionOverflow` if growing would pass the addressable range.
    fn write_range(&mut self, src: &[u8], off: usize, len: usize) -> Result<()>;

    /// Current cursor position.
    fn tell(&self) -> Result<u64>;

    /// Moves the cursor. Seeking past the end is allowed and does not grow the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NegativeSeek` for negative positions and
    /// `StoreError::PositionOverflow` for positions beyond the addressable range.
    fn seek(&mut self, pos: i64) -> Result<()>;

    /// Current length in bytes.
    fn length(&self) -> Result<u64>;

    /// Truncates or zero-extends the store, clamping the cursor to the new end.
    fn set_length(&mut self, new_len: i64) -> Result<()>;

    /// Closes the store. Closing a closed store does nothing.
    fn close(&mut self) -> Result<()>;

    /// Reads up to `dst.len()` bytes into `dst`.
    fn read_slice(&mut self, dst: &mut [u8]) -> Result<Option<usize>> {
        let len = dst.len();
        self.read_range(dst, 0, len)
    }

    /// Fills `dst[off..off + len]` completely or fails with `StoreError::EndOfData`.
    fn read_fully_range(&mut self, dst: &mut [u8], off: usize, len: usize) -> Result<()> {
        self.ensure_open()?;
        check_range(dst.len(), off, len)?;
        let remaining = self.length()?.saturating_sub(self.tell()?);
        if (len as u64) > remaining {
            return Err(StoreError::EndOfData);
        }
        if len > 0 {
            self.read_range(dst, off, len)?;
        }
        Ok(())
    }

    /// Fills `dst` completely or fails with `StoreError::EndOfData`.
    fn read_fully(&mut self, dst: &mut [u8]) -> Result<()> {
        let len = dst.len();
        self.read_fully_range(dst, 0, len)
    }

    /// Advances the cursor by up to `n` bytes without passing the end.
    ///
    /// Returns the distance moved. Non-positive `n` is a no-op returning 0.
    /// A cursor already past the end is pulled back to the end, so the result
    /// is negative in that case.
    fn skip_bytes(&mut self, n: i64) -> Result<i64> {
        self.ensure_open()?;
        if n <= 0 {
            return Ok(0);
        }
        let before = to_position(self.tell()?)?;
        let len = to_position(self.length()?)?;
        let target = before.saturating_add(n).min(len);
        self.seek(target)?;
        Ok(target - before)
    }

    /// Writes all of `src` at the cursor.
    fn write_slice(&mut self, src: &[u8]) -> Result<()> {
        self.write_range(src, 0, src.len())
    }

    /// Reads one byte as a boolean; any nonzero byte is `true`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if no byte remains.
    fn read_bool(&mut self) -> Result<bool> {
        self.ensure_open()?;
        Ok(read_be::<1, _>(self)?[0] != 0)
    }

    /// Reads a two's-complement byte.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if no byte remains.
    fn read_i8(&mut self) -> Result<i8> {
        self.ensure_open()?;
        Ok(i8::from_be_bytes(read_be(self)?))
    }

    /// Reads an unsigned byte.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if no byte remains.
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_open()?;
        Ok(u8::from_be_bytes(read_be(self)?))
    }

    /// Reads a big-endian `i16`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 2 bytes remain.
    fn read_i16(&mut self) -> Result<i16> {
        self.ensure_open()?;
        Ok(i16::from_be_bytes(read_be(self)?))
    }

    /// Reads a big-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 2 bytes remain.
    fn read_u16(&mut self) -> Result<u16> {
        self.ensure_open()?;
        Ok(u16::from_be_bytes(read_be(self)?))
    }

    /// Reads one big-endian UTF-16 code unit.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 2 bytes remain.
    fn read_char(&mut self) -> Result<u16> {
        self.read_u16()
    }

    /// Reads a big-endian `i32`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 4 bytes remain.
    fn read_i32(&mut self) -> Result<i32> {
        self.ensure_open()?;
        Ok(i32::from_be_bytes(read_be(self)?))
    }

    /// Reads a big-endian `i64`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 8 bytes remain.
    fn read_i64(&mut self) -> Result<i64> {
        self.ensure_open()?;
        let high = self.read_i32()?;
        let low = self.read_i32()?;
        Ok((i64::from(high) << 32) | i64::from(low as u32))
    }

    /// Reads an IEEE-754 single from its big-endian bit pattern.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 4 bytes remain.
    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_i32()? as u32))
    }

    /// Reads an IEEE-754 double from its big-endian bit pattern.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if fewer than 8 bytes remain.
    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    /// Reads Latin-1 text up to `\n`, `\r`, `\r\n` or the end of data.
    ///
    /// The terminator is consumed but not returned. Returns `None` only when
    /// the end of data is reached before any character.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.ensure_open()?;
        let mut line = String::new();
        loop {
            match self.read_byte()? {
                None if line.is_empty() => return Ok(None),
                None | Some(b'\n') => break,
                Some(b'\r') => {
                    let cur = to_position(self.tell()?)?;
                    if self.read_byte()? != Some(b'\n') {
                        self.seek(cur)?;
                    }
                    break;
                }
                Some(byte) => line.push(char::from(byte)),
            }
        }
        Ok(Some(line))
    }

    /// Reads a `u16` byte count followed by that many bytes of modified UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EndOfData` if the payload is shorter than its prefix
    /// and `StoreError::MalformedUtf8` if it does not decode.
    fn read_modified_utf8(&mut self) -> Result<String> {
        self.ensure_open()?;
        let len = self.read_u16()?;
        let mut payload = vec![0; usize::from(len)];
        self.read_fully(&mut payload)?;
        codec::decode_modified_utf8(&payload)
    }

    /// Writes `1` for `true` and `0` for `false`.
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.ensure_open()?;
        self.write_byte(u8::from(value))
    }

    /// Writes a two's-complement byte.
    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.ensure_open()?;
        write_be(self, &value.to_be_bytes())
    }

    /// Writes a big-endian `i16`.
    fn write_i16(&mut self, value: i16) -> Result<()> {
        self.ensure_open()?;
        write_be(self, &value.to_be_bytes())
    }

    /// Writes a big-endian `u16`.
    fn write_u16(&mut self, value: u16) -> Result<()> {
        self.ensure_open()?;
        write_be(self, &value.to_be_bytes())
    }

    /// Writes one UTF-16 code unit.
    fn write_char(&mut self, unit: u16) -> Result<()> {
        self.write_u16(unit)
    }

    /// Writes a big-endian `i32`.
    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.ensure_open()?;
        write_be(self, &value.to_be_bytes())
    }

    /// Writes a big-endian `i64`.
    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.ensure_open()?;
        write_be(self, &value.to_be_bytes())
    }

    /// Writes the big-endian bit pattern of `value`, NaN payloads included.
    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_i32(value.to_bits() as i32)
    }

    /// Writes the big-endian bit pattern of `value`, NaN payloads included.
    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_i64(value.to_bits() as i64)
    }

    /// Writes the low 8 bits of each UTF-16 code unit of `s`, without a length prefix.
    fn write_latin1(&mut self, s: &str) -> Result<()> {
        self.ensure_open()?;
        self.write_slice(&codec::latin1_bytes(s))
    }

    /// Writes each UTF-16 code unit of `s` big-endian, without a length prefix.
    fn write_utf16(&mut self, s: &str) -> Result<()> {
        self.ensure_open()?;
        self.write_slice(&codec::utf16_be_bytes(s))
    }

    /// Writes `s` as a `u16` byte count followed by its modified-UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StringTooLong` if the encoding exceeds 65535 bytes.
    fn write_modified_utf8(&mut self, s: &str) -> Result<()> {
        self.ensure_open()?;
        let encoded = codec::encode_modified_utf8(s)?;
        self.write_slice(&encoded)
    }
}

pub(crate) fn check_range(capacity: usize, off: usize, len: usize) -> Result<()> {
    match off.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(StoreError::Bounds(format!(
            "offset {off} + length {len} exceeds buffer of {capacity} bytes"
        ))),
    }
}

pub(crate) fn to_position(pos: u64) -> Result<i64> {
    i64::try_from(pos).map_err(|_| StoreError::PositionOverflow(i64::MAX))
}

fn read_be<const N: usize, S: RandomAccess + ?Sized>(store: &mut S) -> Result<[u8; N]> {
    let mut bytes = [0; N];
    for byte in &mut bytes {
        *byte = store.read_byte()?.ok_or(StoreError::EndOfData)?;
    }
    Ok(bytes)
}

fn write_be<S: RandomAccess + ?Sized>(store: &mut S, bytes: &[u8]) -> Result<()> {
    bytes.iter().try_for_each(|&byte| store.write_byte(byte))
}
