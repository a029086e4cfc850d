//! Tokio adapters for [`RandomAccessStore`].
//!
//! The store never waits, so every poll completes immediately. This lets async
//! code written against `tokio::fs::File` run against the in-memory store.
//!
//! ```rust
//! use ramfake::RandomAccessStore;
//! use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
//!
//! # tokio_test::block_on(async {
//! let mut store = RandomAccessStore::new();
//! store.open().unwrap();
//!
//! store.write_u32(0xCAFE_BABE).await.unwrap();
//! store.rewind().await.unwrap();
//! assert_eq!(store.read_u32().await.unwrap(), 0xCAFE_BABE);
//! # });
//! ```

use std::{
    io::{self, SeekFrom},
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite, ReadBuf};

use crate::{access::RandomAccess, store::RandomAccessStore};

impl AsyncRead for RandomAccessStore {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let dst = buf.initialize_unfilled();
        let len = dst.len();
        let count = match this.read_range(dst, 0, len) {
            Ok(count) => count.unwrap_or(0),
            Err(err) => return Poll::Ready(Err(err.into())),
        };
        buf.advance(count);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for RandomAccessStore {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let result = self.get_mut().write_slice(buf).map(|()| buf.len());
        Poll::Ready(result.map_err(Into::into))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(self.ensure_open().map_err(Into::into))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for RandomAccessStore {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        self.get_mut().resolve_seek(position)?;
        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(self.get_mut().tell().map_err(Into::into))
    }
}
