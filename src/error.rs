use std::{fmt, io};

/// Errors that can occur when working with a random-access store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// An operation was attempted while the store was closed.
    Closed,
    /// `open` was called on a store that is already open.
    AlreadyOpen,
    /// A seek or length request was negative.
    NegativeSeek(i64),
    /// A seek or length request exceeded the addressable range.
    PositionOverflow(i64),
    /// Fewer bytes remained than a fixed-size read required.
    EndOfData,
    /// A string's modified-UTF-8 encoding does not fit the 16-bit length prefix.
    StringTooLong(usize),
    /// Offset/length arguments are inconsistent with the buffer they address.
    Bounds(String),
    /// Modified-UTF-8 payload is malformed around the given byte offset.
    MalformedUtf8(usize),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Closed => write!(f, "Store is closed"),
            StoreError::AlreadyOpen => write!(f, "Store is already open"),
            StoreError::NegativeSeek(pos) => {
                write!(f, "Negative seek offset: {pos}")
            }
            StoreError::PositionOverflow(pos) => {
                write!(f, "Position out of addressable range: {pos}")
            }
            StoreError::EndOfData => write!(f, "Unexpected end of data"),
            StoreError::StringTooLong(len) => {
                write!(f, "Encoded string too long: {len} bytes")
            }
            StoreError::Bounds(msg) => write!(f, "Out of bounds: {msg}"),
            StoreError::MalformedUtf8(offset) => {
                write!(f, "Malformed input around byte {offset}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for io::Error {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::EndOfData => io::ErrorKind::UnexpectedEof,
            StoreError::NegativeSeek(_)
            | StoreError::PositionOverflow(_)
            | StoreError::StringTooLong(_)
            | StoreError::Bounds(_) => io::ErrorKind::InvalidInput,
            StoreError::MalformedUtf8(_) => io::ErrorKind::InvalidData,
            StoreError::Closed | StoreError::AlreadyOpen => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
