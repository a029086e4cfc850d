/// Largest position the disk-backed contract can address (a signed 32-bit offset).
pub const DEFAULT_MAX_POSITION: u64 = i32::MAX as u64;

/// Construction-time settings for a [`RandomAccessStore`](crate::RandomAccessStore).
///
/// ```rust
/// use ramfake::{RandomAccessStore, StoreConfig};
///
/// let store = RandomAccessStore::with_config(
///     StoreConfig::default()
///         .with_max_position(1024)
///         .with_initial_contents(b"seed".to_vec()),
/// );
/// assert_eq!(store.backing_bytes(), b"seed");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Largest cursor or length accepted by `seek` and `set_length`.
    pub max_position: u64,
    /// Bytes the store holds before the first `open`.
    pub initial_contents: Vec<u8>,
}

impl StoreConfig {
    /// Sets the largest cursor or length the store accepts.
    pub fn with_max_position(mut self, max_position: u64) -> Self {
        self.max_position = max_position;
        self
    }

    /// Seeds the store with `contents`.
    pub fn with_initial_contents(mut self, contents: Vec<u8>) -> Self {
        self.initial_contents = contents;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_position: DEFAULT_MAX_POSITION,
            initial_contents: Vec::new(),
        }
    }
}
