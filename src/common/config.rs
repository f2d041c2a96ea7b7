//! Configuration constants for blockpool.

/// Size of a block in bytes (4KB).
///
/// This value is chosen to match:
/// - OS page size on most systems (4096 bytes)
/// - Common database page sizes (PostgreSQL uses 8KB, but 4KB is also standard)
///
/// # Alignment
/// In-memory block images are aligned to 4096 bytes for efficient
/// Direct I/O (O_DIRECT).
pub const BLOCK_SIZE: usize = 4096;

/// Maximum number of blocks per file with a u32 block number.
pub const MAX_BLOCKS_PER_FILE: u64 = (u32::MAX as u64) + 1;

/// Maximum theoretical size of a single block file in bytes.
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_BLOCKS_PER_FILE * BLOCK_SIZE as u64;
