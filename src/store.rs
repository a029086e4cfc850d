use log::{debug, trace};

use crate::{
    Result,
    access::{RandomAccess, check_range},
    config::StoreConfig,
    error::StoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
}

/// An in-memory stand-in for a random-access file.
///
/// The store starts closed, empty, with its cursor at 0. [`open`](Self::open)
/// rewinds the cursor but keeps the contents, so a test can write, close,
/// reopen and read back what it wrote.
///
/// The backing buffer always has exactly the logical length of the file and
/// is grown only as far as each write needs.
#[derive(Debug, Clone)]
pub struct RandomAccessStore {
    data: Vec<u8>,
    pos: usize,
    state: State,
    max_position: u64,
}

impl RandomAccessStore {
    /// Creates a new, closed, empty store.
    pub fn new() -> Self { Self::with_config(StoreConfig::default()) }

    /// Creates a new, closed store from `config`.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            data: config.initial_contents,
            pos: 0,
            state: State::Closed,
            max_position: config.max_position,
        }
    }

    /// Opens the store and rewinds the cursor to the beginning.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyOpen` if the store is open.
    pub fn open(&mut self) -> Result<()> {
        if self.state == State::Open {
            return Err(StoreError::AlreadyOpen);
        }
        debug!("opening store ({} bytes)", self.data.len());
        self.state = State::Open;
        self.pos = 0;
        Ok(())
    }

    /// Whether the store accepts data operations.
    pub fn is_open(&self) -> bool { self.state == State::Open }

    /// Raw view of the backing buffer, regardless of open state.
    ///
    /// This breaks encapsulation and exists for test assertions only; code
    /// written against [`RandomAccess`] must not depend on it.
    pub fn backing_bytes(&self) -> &[u8] { &self.data }

    /// Consumes the store, returning the backing buffer.
    pub fn into_inner(self) -> Vec<u8> { self.data }

    fn check_position(&self, pos: i64) -> Result<usize> {
        if pos < 0 {
            return Err(StoreError::NegativeSeek(pos));
        }
        if pos as u64 > self.max_position {
            return Err(StoreError::PositionOverflow(pos));
        }
        usize::try_from(pos).map_err(|_| StoreError::PositionOverflow(pos))
    }

    /// Zero-extends the buffer to `new_len`. The length never exceeds `max_position`.
    fn grow(&mut self, new_len: usize) -> Result<()> {
        if new_len as u64 > self.max_position {
            return Err(StoreError::PositionOverflow(
                i64::try_from(new_len).unwrap_or(i64::MAX),
            ));
        }
        trace!("growing backing buffer from {} to {} bytes", self.data.len(), new_len);
        self.data.resize(new_len, 0);
        Ok(())
    }
}

impl Default for RandomAccessStore {
    fn default() -> Self { Self::new() }
}

impl RandomAccess for RandomAccessStore {
    fn ensure_open(&self) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Closed => Err(StoreError::Closed),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.ensure_open()?;
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn read_range(&mut self, dst: &mut [u8], off: usize, len: usize) -> Result<Option<usize>> {
        self.ensure_open()?;
        check_range(dst.len(), off, len)?;

        let count = len.min(self.data.len().saturating_sub(self.pos));
        if count == 0 {
            return Ok(None);
        }

        dst[off..off + count].copy_from_slice(&self.data[self.pos..self.pos + count]);
        self.pos += count;
        Ok(Some(count))
    }

    fn write_byte(&mut self, value: u8) -> Result<()> {
        self.ensure_open()?;
        if self.data.len() < self.pos + 1 {
            self.grow(self.pos + 1)?;
        }
        self.data[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    fn write_range(&mut self, src: &[u8], off: usize, len: usize) -> Result<()> {
        self.ensure_open()?;
        check_range(src.len(), off, len)?;

        let end = self.pos + len;
        // Ranged writes reserve one byte past the written region.
        if self.data.len() <= end {
            self.grow(end + 1)?;
        }

        self.data[self.pos..end].copy_from_slice(&src[off..off + len]);
        self.pos = end;
        Ok(())
    }

    fn tell(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.pos as u64)
    }

    fn seek(&mut self, pos: i64) -> Result<()> {
        self.ensure_open()?;
        self.pos = self.check_position(pos)?;
        Ok(())
    }

    fn length(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.data.len() as u64)
    }

    fn set_length(&mut self, new_len: i64) -> Result<()> {
        self.ensure_open()?;
        let new_len = self.check_position(new_len)?;

        if new_len != self.data.len() {
            debug!("resizing store from {} to {} bytes", self.data.len(), new_len);
            self.data.resize(new_len, 0);
        }
        if self.pos > new_len {
            self.pos = new_len;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.state == State::Open {
            debug!("closing store ({} bytes)", self.data.len());
            self.state = State::Closed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }

    fn open_store(contents: &[u8]) -> Result<RandomAccessStore> {
        init_logging();
        let mut store = RandomAccessStore::with_config(
            StoreConfig::default().with_initial_contents(contents.to_vec()),
        );
        store.open()?;
        Ok(store)
    }

    #[test]
    fn test_lifecycle() -> Result<()> {
        init_logging();
        let mut store = RandomAccessStore::new();
        assert!(!store.is_open());
        assert_eq!(store.tell(), Err(StoreError::Closed));

        store.open()?;
        assert_eq!(store.open(), Err(StoreError::AlreadyOpen));

        store.write_slice(b"abc")?;
        store.close()?;
        store.close()?;
        assert_eq!(store.length(), Err(StoreError::Closed));

        // reopening keeps the contents and rewinds
        store.open()?;
        assert_eq!(store.tell()?, 0);
        assert_eq!(store.read_byte()?, Some(b'a'));

        Ok(())
    }

    fn assert_every_operation_closed(store: &mut RandomAccessStore) {
        let before = store.backing_bytes().to_vec();
        let mut buf = [0u8; 4];

        assert_eq!(store.ensure_open(), Err(StoreError::Closed));
        assert_eq!(store.read_byte(), Err(StoreError::Closed));
        assert_eq!(store.read_range(&mut buf, 0, 4), Err(StoreError::Closed));
        assert_eq!(store.read_slice(&mut buf), Err(StoreError::Closed));
        assert_eq!(store.read_fully(&mut buf), Err(StoreError::Closed));
        assert_eq!(store.read_fully_range(&mut buf, 0, 9), Err(StoreError::Closed));
        assert_eq!(store.write_byte(1), Err(StoreError::Closed));
        assert_eq!(store.write_range(&buf, 0, 4), Err(StoreError::Closed));
        assert_eq!(store.write_slice(&buf), Err(StoreError::Closed));
        assert_eq!(store.tell(), Err(StoreError::Closed));
        assert_eq!(store.seek(-1), Err(StoreError::Closed));
        assert_eq!(store.length(), Err(StoreError::Closed));
        assert_eq!(store.set_length(3), Err(StoreError::Closed));
        assert_eq!(store.skip_bytes(0), Err(StoreError::Closed));

        assert_eq!(store.read_bool(), Err(StoreError::Closed));
        assert_eq!(store.read_i8(), Err(StoreError::Closed));
        assert_eq!(store.read_u8(), Err(StoreError::Closed));
        assert_eq!(store.read_i16(), Err(StoreError::Closed));
        assert_eq!(store.read_u16(), Err(StoreError::Closed));
        assert_eq!(store.read_char(), Err(StoreError::Closed));
        assert_eq!(store.read_i32(), Err(StoreError::Closed));
        assert_eq!(store.read_i64(), Err(StoreError::Closed));
        assert_eq!(store.read_f32(), Err(StoreError::Closed));
        assert_eq!(store.read_f64(), Err(StoreError::Closed));
        assert_eq!(store.read_line(), Err(StoreError::Closed));
        assert_eq!(store.read_modified_utf8(), Err(StoreError::Closed));

        assert_eq!(store.write_bool(true), Err(StoreError::Closed));
        assert_eq!(store.write_i8(-1), Err(StoreError::Closed));
        assert_eq!(store.write_i16(-1), Err(StoreError::Closed));
        assert_eq!(store.write_u16(1), Err(StoreError::Closed));
        assert_eq!(store.write_char(0x41), Err(StoreError::Closed));
        assert_eq!(store.write_i32(7), Err(StoreError::Closed));
        assert_eq!(store.write_i64(7), Err(StoreError::Closed));
        assert_eq!(store.write_f32(1.5), Err(StoreError::Closed));
        assert_eq!(store.write_f64(1.5), Err(StoreError::Closed));
        assert_eq!(store.write_latin1("x"), Err(StoreError::Closed));
        assert_eq!(store.write_utf16("x"), Err(StoreError::Closed));
        assert_eq!(store.write_modified_utf8(&"\u{800}".repeat(30_000)), Err(StoreError::Closed));

        assert_eq!(store.backing_bytes(), before.as_slice());
        assert!(!store.is_open());
    }

    #[test]
    fn test_closed_guard_on_fresh_store() {
        init_logging();
        let mut store = RandomAccessStore::new();
        assert_every_operation_closed(&mut store);
    }

    #[test]
    fn test_closed_guard_after_close() -> Result<()> {
        let mut store = open_store(b"")?;
        store.write_slice(b"abc")?;
        store.close()?;
        assert_every_operation_closed(&mut store);
        Ok(())
    }

    #[test]
    fn test_read_byte_at_end() -> Result<()> {
        let mut store = open_store(b"z")?;
        assert_eq!(store.read_byte()?, Some(b'z'));
        assert_eq!(store.read_byte()?, None);
        assert_eq!(store.tell()?, 1);
        Ok(())
    }

    #[test]
    fn test_read_range() -> Result<()> {
        let mut store = open_store(b"hello")?;
        let mut buf = [0u8; 8];

        assert_eq!(store.read_range(&mut buf, 2, 3)?, Some(3));
        assert_eq!(&buf[..5], b"\0\0hel");

        // short read at the tail
        assert_eq!(store.read_range(&mut buf, 0, 8)?, Some(2));
        assert_eq!(&buf[..2], b"lo");

        assert_eq!(store.read_range(&mut buf, 0, 8)?, None);

        let result = store.read_range(&mut buf, 4, 5);
        assert!(matches!(result, Err(StoreError::Bounds(_))));
        Ok(())
    }

    #[test]
    fn test_read_fully() -> Result<()> {
        let mut store = open_store(b"abcdef")?;
        let mut buf = [0u8; 4];

        store.read_fully(&mut buf)?;
        assert_eq!(&buf, b"abcd");

        assert_eq!(store.read_fully(&mut buf), Err(StoreError::EndOfData));
        assert!(store.is_open());

        store.read_fully_range(&mut buf, 1, 2)?;
        assert_eq!(&buf, b"aefd");

        // an empty read at the end is not an error
        store.read_fully_range(&mut buf, 0, 0)?;
        Ok(())
    }

    #[test]
    fn test_write_byte_grows_exactly() -> Result<()> {
        let mut store = open_store(b"")?;
        store.write_byte(0xFF)?;
        assert_eq!(store.backing_bytes(), &[0xFF]);

        store.seek(3)?;
        assert_eq!(store.length()?, 1);
        store.write_byte(7)?;
        assert_eq!(store.backing_bytes(), &[0xFF, 0, 0, 7]);
        assert_eq!(store.tell()?, 4);
        Ok(())
    }

    #[test]
    fn test_write_range_growth_margin() -> Result<()> {
        let mut store = open_store(b"")?;
        store.write_range(b"xhelloy", 1, 5)?;
        assert_eq!(store.backing_bytes(), b"hello\0");
        assert_eq!(store.tell()?, 5);

        // fits strictly inside: no growth
        store.seek(0)?;
        store.write_slice(b"HELL")?;
        assert_eq!(store.backing_bytes(), b"HELLo\0");

        // ends exactly at the current length: grows by one
        store.seek(2)?;
        store.write_slice(b"1234")?;
        assert_eq!(store.backing_bytes(), b"HE1234\0");

        let result = store.write_range(b"ab", 1, 2);
        assert!(matches!(result, Err(StoreError::Bounds(_))));
        Ok(())
    }

    #[test]
    fn test_seek() -> Result<()> {
        let mut store = open_store(b"abc")?;
        assert_eq!(store.seek(-1), Err(StoreError::NegativeSeek(-1)));

        let past = i64::from(i32::MAX) + 1;
        assert_eq!(store.seek(past), Err(StoreError::PositionOverflow(past)));

        store.seek(100)?;
        assert_eq!(store.tell()?, 100);
        assert_eq!(store.length()?, 3);
        assert_eq!(store.read_byte()?, None);
        Ok(())
    }

    #[test]
    fn test_configured_max_position() -> Result<()> {
        init_logging();
        let mut store = RandomAccessStore::with_config(StoreConfig::default().with_max_position(8));
        store.open()?;
        store.seek(8)?;
        assert_eq!(store.seek(9), Err(StoreError::PositionOverflow(9)));
        assert_eq!(store.set_length(9), Err(StoreError::PositionOverflow(9)));
        Ok(())
    }

    #[test]
    fn test_writes_stay_within_max_position() -> Result<()> {
        init_logging();
        let mut store = RandomAccessStore::with_config(StoreConfig::default().with_max_position(8));
        store.open()?;

        // the ranged write would need 21 bytes
        assert_eq!(store.write_slice(&[1; 20]), Err(StoreError::PositionOverflow(21)));
        assert_eq!(store.length()?, 0);
        assert_eq!(store.tell()?, 0);

        // 7 bytes plus the growth margin fill the store exactly
        store.write_slice(&[1; 7])?;
        assert_eq!(store.length()?, 8);
        store.write_byte(2)?;
        assert_eq!(store.write_byte(3), Err(StoreError::PositionOverflow(9)));

        // every byte stays reachable
        store.seek(0)?;
        assert_eq!(store.skip_bytes(100)?, 8);
        store.seek(8)?;
        assert_eq!(store.length()?, 8);

        store.seek(3)?;
        assert_eq!(store.write_slice(&[9; 6]), Err(StoreError::PositionOverflow(10)));
        assert_eq!(store.backing_bytes(), &[1, 1, 1, 1, 1, 1, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_set_length() -> Result<()> {
        let mut store = open_store(b"abcdef")?;
        store.seek(5)?;

        store.set_length(3)?;
        assert_eq!(store.tell()?, 3);
        assert_eq!(store.backing_bytes(), b"abc");

        store.set_length(6)?;
        assert_eq!(store.tell()?, 3);
        let mut tail = [0xAA; 3];
        store.read_fully(&mut tail)?;
        assert_eq!(tail, [0, 0, 0]);

        store.set_length(6)?;
        assert_eq!(store.tell()?, 6);

        assert_eq!(store.set_length(-2), Err(StoreError::NegativeSeek(-2)));
        Ok(())
    }

    #[test]
    fn test_skip_bytes() -> Result<()> {
        let mut store = open_store(b"0123456789")?;
        assert_eq!(store.skip_bytes(0)?, 0);
        assert_eq!(store.skip_bytes(-5)?, 0);
        assert_eq!(store.tell()?, 0);

        assert_eq!(store.skip_bytes(4)?, 4);
        assert_eq!(store.skip_bytes(100)?, 6);
        assert_eq!(store.tell()?, 10);
        assert_eq!(store.skip_bytes(1)?, 0);

        store.seek(12)?;
        assert_eq!(store.skip_bytes(1)?, -2);
        assert_eq!(store.tell()?, 10);
        Ok(())
    }

    #[test]
    fn test_into_inner() -> Result<()> {
        let mut store = open_store(b"")?;
        store.write_i16(0x0102)?;
        store.close()?;
        assert_eq!(store.into_inner(), vec![1, 2]);
        Ok(())
    }
}
