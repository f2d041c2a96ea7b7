//! Error types for blockpool.

use crate::common::BlockId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in blockpool.
///
/// Only two failure classes exist at this layer:
/// - [`Error::PoolExhausted`] is non-fatal and expected under load. It is a
///   typed result, never a panic, so the caller can implement its own
///   wait/retry/abort policy.
/// - [`Error::Io`] and [`Error::BlockNotFound`] are storage faults. They are
///   propagated to the caller without local recovery; this layer performs
///   no retries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No unpinned buffer is available for `pin`/`pin_new`.
    ///
    /// This happens when every slot in the pool is pinned.
    #[error("buffer pool exhausted: all buffers are pinned")]
    PoolExhausted,

    /// I/O error from the block store.
    ///
    /// This wraps `std::io::Error` from file read/write operations.
    #[error("storage fault: {0}")]
    Io(#[from] std::io::Error),

    /// Requested block lies beyond the allocated extent of its file.
    #[error("block {block} not found in file {file}")]
    BlockNotFound {
        /// Name of the block file.
        file: String,
        /// Block number that was requested.
        block: u32,
    },
}

impl Error {
    pub(crate) fn block_not_found(blk: &BlockId) -> Self {
        Error::BlockNotFound {
            file: blk.file().to_string(),
            block: blk.num(),
        }
    }
}
