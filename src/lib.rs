//! An in-memory random-access file for tests.
//!
//! [`RandomAccessStore`] keeps a growable byte buffer and a cursor, and
//! implements [`RandomAccess`], the same contract a disk-backed file adapter
//! implements. Code that depends only on the trait cannot tell the two apart:
//! numbers are big-endian, lines are Latin-1, and strings use the
//! length-prefixed modified-UTF-8 format.
//!
//! # Examples
//!
//! ```rust
//! use ramfake::{RandomAccess, RandomAccessStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = RandomAccessStore::new();
//!     store.open()?;
//!
//!     store.write_i32(-42)?;
//!     store.write_modified_utf8("h\u{e9}llo")?;
//!     store.close()?;
//!
//!     store.open()?;
//!     assert_eq!(store.read_i32()?, -42);
//!     assert_eq!(store.read_modified_utf8()?, "h\u{e9}llo");
//!
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod codec;
pub mod config;
pub mod error;
mod io;
mod store;
mod tokio_io;

pub use access::RandomAccess;
pub use config::StoreConfig;
pub use error::StoreError;
pub use store::RandomAccessStore;

pub type Result<T> = std::result::Result<T, StoreError>;
