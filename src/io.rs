//! `std::io` adapters, so a [`RandomAccessStore`] can stand in wherever a
//! `std::fs::File` is read, written or seeked.
//!
//! Writes go through [`RandomAccess::write_slice`] and keep its growth margin.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::{
    Result,
    access::{RandomAccess, to_position},
    error::StoreError,
    store::RandomAccessStore,
};

impl RandomAccessStore {
    /// Resolves `from` against the cursor or the length and seeks there.
    pub(crate) fn resolve_seek(&mut self, from: SeekFrom) -> Result<u64> {
        let target = match from {
            SeekFrom::Start(pos) => to_position(pos)?,
            SeekFrom::End(delta) => offset(self.length()?, delta)?,
            SeekFrom::Current(delta) => offset(self.tell()?, delta)?,
        };
        RandomAccess::seek(self, target)?;
        self.tell()
    }
}

fn offset(base: u64, delta: i64) -> Result<i64> {
    to_position(base)?
        .checked_add(delta)
        .ok_or(StoreError::PositionOverflow(i64::MAX))
}

impl Read for RandomAccessStore {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_slice(buf)?.unwrap_or(0))
    }
}

impl Write for RandomAccessStore {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_slice(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        Ok(())
    }
}

impl Seek for RandomAccessStore {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.resolve_seek(pos)?)
    }
}
