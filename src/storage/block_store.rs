//! File block store - low-level block I/O for the buffer pool.
//!
//! The [`FileBlockStore`] handles all direct file operations:
//! - Reading and writing blocks
//! - Allocating new blocks at the end of a file
//! - Managing the set of open block files

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::common::config::BLOCK_SIZE;
use crate::common::{BlockId, Error, Result};
use crate::storage::Page;

struct BlockFile {
    file: File,
    /// Number of allocated blocks, tracked alongside the handle so
    /// out-of-range access fails without a metadata syscall.
    blocks: u32,
}

/// Block I/O over a directory of files.
///
/// # File Layout
/// Every file in the store directory is a sequence of fixed-size blocks:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┐
/// │ Block 0 │ Block 1 │ Block 2 │  ...    │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │
/// └─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192
/// ```
///
/// Block `n` is located at file offset `n × BLOCK_SIZE`. Files are created
/// on first use and handles stay open for the store's lifetime.
///
/// # Thread Safety
/// The handle map sits behind a mutex, so a store can be shared via `Arc`
/// between the buffer pool and direct callers (e.g. a recovery pass reading
/// blocks the pool never touched). I/O itself is serialized per store.
///
/// # Durability
/// Writes and allocations are followed by `fsync()`. This is conservative
/// and will be revisited when group commit exists above this layer.
pub struct FileBlockStore {
    dir: PathBuf,
    files: Mutex<HashMap<String, BlockFile>>,
}

impl FileBlockStore {
    /// Open a block store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            files: Mutex::new(HashMap::new()),
        })
    }

    /// Read a block into a fresh [`Page`].
    ///
    /// # Errors
    /// Returns [`Error::BlockNotFound`] if the block lies beyond the file's
    /// allocated extent.
    pub fn read(&self, blk: &BlockId) -> Result<Page> {
        let mut files = self.files.lock();
        let entry = self.entry(&mut files, blk.file())?;

        if blk.num() >= entry.blocks {
            return Err(Error::block_not_found(blk));
        }

        entry.file.seek(SeekFrom::Start(block_offset(blk.num())))?;

        let mut page = Page::new();
        entry.file.read_exact(page.as_mut_slice())?;

        Ok(page)
    }

    /// Write a page to its block on disk.
    ///
    /// The block must have been previously allocated with
    /// [`FileBlockStore::allocate`].
    ///
    /// # Errors
    /// Returns [`Error::BlockNotFound`] if the block hasn't been allocated.
    pub fn write(&self, blk: &BlockId, page: &Page) -> Result<()> {
        let mut files = self.files.lock();
        let entry = self.entry(&mut files, blk.file())?;

        if blk.num() >= entry.blocks {
            return Err(Error::block_not_found(blk));
        }

        entry.file.seek(SeekFrom::Start(block_offset(blk.num())))?;
        entry.file.write_all(page.as_slice())?;
        entry.file.sync_all()?; // fsync for durability

        Ok(())
    }

    /// Allocate a new block at the end of `file_name`.
    ///
    /// Returns the [`BlockId`] of the newly allocated block. The block is
    /// initialized with zeros on disk.
    pub fn allocate(&self, file_name: &str) -> Result<BlockId> {
        let mut files = self.files.lock();
        let entry = self.entry(&mut files, file_name)?;

        let num = entry.blocks;

        entry.file.seek(SeekFrom::Start(block_offset(num)))?;
        let zeros = [0u8; BLOCK_SIZE];
        entry.file.write_all(&zeros)?;
        entry.file.sync_all()?;

        entry.blocks += 1;
        Ok(BlockId::new(file_name, num))
    }

    /// Number of allocated blocks in `file_name`.
    pub fn block_count(&self, file_name: &str) -> Result<u32> {
        let mut files = self.files.lock();
        let entry = self.entry(&mut files, file_name)?;
        Ok(entry.blocks)
    }

    /// Directory the store is rooted at.
    #[inline]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Look up or open the handle for `file_name`.
    ///
    /// Block count for an existing file is derived from its length.
    fn entry<'m>(
        &self,
        files: &'m mut HashMap<String, BlockFile>,
        file_name: &str,
    ) -> Result<&'m mut BlockFile> {
        match files.entry(file_name.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                let path = self.dir.join(file_name);
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .open(path)?;

                let len = file.metadata()?.len();
                let blocks = (len / BLOCK_SIZE as u64) as u32;

                Ok(v.insert(BlockFile { file, blocks }))
            }
        }
    }
}

fn block_offset(num: u32) -> u64 {
    (num as u64) * (BLOCK_SIZE as u64)
}
