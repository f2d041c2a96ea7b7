//! Pin handles.
//!
//! A [`PinnedBuffer`] is the pool's receipt for one pin: while it lives, the
//! buffer's block assignment cannot be evicted. Dropping it (or passing it to
//! [`BufferPool::unpin`](crate::buffer::BufferPool::unpin)) releases the pin.

use std::ops::Deref;
use std::sync::Arc;

use crate::buffer::pool::BufferPool;
use crate::buffer::Buffer;
use crate::common::{BlockId, BufferId};

/// A pinned buffer.
///
/// Derefs to [`Buffer`], so content access and the modification marker are
/// used directly on the handle:
///
/// ```ignore
/// let buf = pool.pin(&blk)?;
/// buf.page_mut().write_u32(0, 7);
/// buf.mark_modified(txn);
/// // buf drops here: pin released
/// ```
///
/// Handles are not clonable and unpinning consumes them, so a pin count can
/// never be driven below zero from safe code - the "unpin of an unpinned
/// buffer" misuse has no representation.
pub struct PinnedBuffer<'a> {
    /// Reference back to the pool for release on drop.
    pool: &'a BufferPool,
    /// Slot holding this block.
    id: BufferId,
    /// Block this pin holds resident.
    block: BlockId,
    /// Content half of the slot, shared with the pool.
    buf: Arc<Buffer>,
}

impl<'a> PinnedBuffer<'a> {
    /// Called by `BufferPool::pin` / `BufferPool::pin_new`.
    pub(crate) fn new(pool: &'a BufferPool, id: BufferId, block: BlockId, buf: Arc<Buffer>) -> Self {
        Self {
            pool,
            id,
            block,
            buf,
        }
    }

    /// Slot this pin refers to. Two pins of the same resident block report
    /// the same id.
    #[inline]
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Block this pin holds resident.
    #[inline]
    pub fn block(&self) -> &BlockId {
        &self.block
    }

    /// Release the pin explicitly. Identical to dropping the handle.
    pub fn unpin(self) {}
}

impl Deref for PinnedBuffer<'_> {
    type Target = Buffer;

    #[inline]
    fn deref(&self) -> &Buffer {
        &self.buf
    }
}

impl Drop for PinnedBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(self.id);
    }
}
