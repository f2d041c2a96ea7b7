//! Buffer - the content half of a pool slot.
//!
//! A [`Buffer`] holds the in-memory image of one block plus the modification
//! marker the flush path consults. The residency bookkeeping (assigned block,
//! pin count) lives inside the pool's single locked aggregate; the content
//! lives here so pin holders can read and write it without holding the pool
//! lock.

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::TxnId;
use crate::storage::Page;

/// The shareable half of a buffer slot.
///
/// Buffers are created once at pool construction and never destroyed, only
/// reassigned to different blocks as the pool services misses.
///
/// # Thread Safety
/// - `page`: `RwLock` — many readers or one writer among pin holders
/// - `modified_by`: `Mutex` — tiny critical sections, never held across I/O
///
/// Lock order is always pool state first, buffer internals second. A pin
/// holder only ever takes buffer internals, so it can never deadlock against
/// a flush.
pub struct Buffer {
    /// The block image, protected by RwLock.
    page: RwLock<Page>,

    /// `Some(txn)` while the content differs from disk; records which
    /// transaction last modified it. `None` means clean.
    modified_by: Mutex<Option<TxnId>>,
}

impl Buffer {
    /// Create a new empty buffer.
    pub(crate) fn new() -> Self {
        Self {
            page: RwLock::new(Page::new()),
            modified_by: Mutex::new(None),
        }
    }

    /// Acquire read access to the block image.
    #[inline]
    pub fn page(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read()
    }

    /// Acquire write access to the block image.
    ///
    /// Writing content is the pin holder's privilege; remember to call
    /// [`Buffer::mark_modified`] afterwards or the change will not survive
    /// eviction.
    #[inline]
    pub fn page_mut(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write()
    }

    /// Record that `txn` modified this buffer's content.
    ///
    /// The marker stays set until a flush writes the content back.
    #[inline]
    pub fn mark_modified(&self, txn: TxnId) {
        *self.modified_by.lock() = Some(txn);
    }

    /// The transaction recorded by the last [`Buffer::mark_modified`], if
    /// the buffer is dirty.
    #[inline]
    pub fn modifying_txn(&self) -> Option<TxnId> {
        *self.modified_by.lock()
    }

    /// Check if the buffer content differs from disk.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modifying_txn().is_some()
    }

    /// Clear the modification marker after a successful write-back.
    #[inline]
    pub(crate) fn clear_modified(&self) {
        *self.modified_by.lock() = None;
    }
}
