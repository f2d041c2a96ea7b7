//! Buffer Pool - the core block caching layer.
//!
//! The [`BufferPool`] provides:
//! - Block caching between disk and memory
//! - Pin-based reference counting
//! - Transaction-scoped dirty tracking and write-back
//! - Pluggable victim-selection policies

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::victim::{FirstFit, VictimPolicy};
use crate::buffer::{Buffer, PageFormatter, PinnedBuffer, PoolStats};
use crate::common::{BlockId, BufferId, Error, Result, TxnId};
use crate::storage::{FileBlockStore, Page};

/// What happens to the residency mapping when a buffer's pin count
/// reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Keep the mapping until the buffer is evicted. A re-pin of resident
    /// content is a hit with no I/O. The default.
    #[default]
    UntilEviction,

    /// Remove the mapping on the last unpin. A re-pin always reloads the
    /// block from storage. Defeats caching; exists for callers that depend
    /// on reload-on-repin semantics.
    DropOnLastUnpin,
}

/// Construction-time options for [`BufferPool`].
pub struct PoolOptions {
    /// Victim-selection policy. Defaults to [`FirstFit`]. A fixed-size
    /// policy (e.g. `ClockSweep`) must be sized to the pool capacity.
    pub policy: Box<dyn VictimPolicy>,
    /// Mapping retention on full unpin. Defaults to
    /// [`Retention::UntilEviction`].
    pub retention: Retention,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            policy: Box::new(FirstFit::new()),
            retention: Retention::UntilEviction,
        }
    }
}

/// One slot's bookkeeping half. Content and the dirty marker live in the
/// shared [`Buffer`]; everything here is guarded by the pool mutex.
struct Slot {
    buf: Arc<Buffer>,
    block: Option<BlockId>,
    pins: u32,
}

/// The single protected aggregate: slot array, residency map, available
/// counter and policy state always mutate together under one lock, so they
/// cannot drift apart.
struct PoolState {
    slots: Vec<Slot>,
    resident: HashMap<BlockId, BufferId>,
    available: usize,
    policy: Box<dyn VictimPolicy>,
    retention: Retention,
}

/// Manages a fixed pool of buffers caching disk blocks.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │                       BufferPool                          │
/// │  Mutex<PoolState> ───────────────────────────────┐        │
/// │  │ resident: BlockId → BufferId                  │        │
/// │  │ slots: [Slot0] [Slot1] [Slot2] ...            │        │
/// │  │ available · policy                            │        │
/// │  └───────────────────────────────────────────────┘        │
/// │  stats (atomics)          store: Arc<FileBlockStore>      │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// # Concurrency
/// Every mutating operation (`pin`, `pin_new`, unpin, `flush_all`) runs under
/// the one pool mutex, so victim selection, map updates and counter changes
/// are observed atomically by all threads. Block content lives behind a
/// per-buffer `RwLock` that pin holders take *without* the pool lock. Keep
/// page guards short and never hold one across a pool call, or a concurrent
/// flush can wait on your guard while you wait on the pool.
///
/// # Exhaustion
/// When every slot is pinned, `pin`/`pin_new` return
/// [`Error::PoolExhausted`] immediately. Wait/retry/backoff policy belongs to
/// the caller.
///
/// # Usage
/// ```no_run
/// use std::sync::Arc;
/// use blockpool::{BufferPool, FileBlockStore, TxnId, ZeroFormatter};
///
/// let store = Arc::new(FileBlockStore::open("db")?);
/// let pool = BufferPool::new(8, Arc::clone(&store));
///
/// let buf = pool.pin_new("users.tbl", &ZeroFormatter)?;
/// buf.page_mut().write_u32(0, 99);
/// buf.mark_modified(TxnId::new(1));
/// drop(buf); // unpins
///
/// pool.flush_all(TxnId::new(1))?;
/// # Ok::<(), blockpool::Error>(())
/// ```
pub struct BufferPool {
    state: Mutex<PoolState>,

    /// Performs all block I/O; shared so callers can read around the pool.
    store: Arc<FileBlockStore>,

    /// Performance statistics.
    stats: PoolStats,

    /// Number of slots in the pool (immutable after construction).
    capacity: usize,
}

impl BufferPool {
    /// Create a buffer pool with the default policy (first-fit) and
    /// retention (until eviction).
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize, store: Arc<FileBlockStore>) -> Self {
        Self::with_options(capacity, store, PoolOptions::default())
    }

    /// Create a buffer pool with explicit options.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn with_options(
        capacity: usize,
        store: Arc<FileBlockStore>,
        options: PoolOptions,
    ) -> Self {
        assert!(capacity > 0, "capacity must be > 0");

        // Allocate all buffers upfront; they are reassigned, never replaced.
        let slots: Vec<Slot> = (0..capacity)
            .map(|_| Slot {
                buf: Arc::new(Buffer::new()),
                block: None,
                pins: 0,
            })
            .collect();

        let mut policy = options.policy;
        for i in 0..capacity {
            policy.set_candidate(BufferId::new(i), true);
        }

        Self {
            state: Mutex::new(PoolState {
                slots,
                resident: HashMap::new(),
                available: capacity,
                policy,
                retention: options.retention,
            }),
            store,
            stats: PoolStats::new(),
            capacity,
        }
    }

    // ========================================================================
    // Public API: pinning
    // ========================================================================

    /// Pin a buffer to `blk`, loading it from the store on a miss.
    ///
    /// If a buffer is already assigned to that block the same buffer is
    /// returned with its pin count bumped; otherwise an unpinned buffer is
    /// reassigned (writing its old content back first if dirty).
    ///
    /// # Errors
    /// - [`Error::PoolExhausted`] if every buffer is pinned
    /// - [`Error::BlockNotFound`] / [`Error::Io`] from the store
    pub fn pin(&self, blk: &BlockId) -> Result<PinnedBuffer<'_>> {
        let mut state = self.state.lock();

        // Hit: the block is resident.
        if let Some(&id) = state.resident.get(blk) {
            let was_unpinned = state.slots[id.0].pins == 0;
            state.slots[id.0].pins += 1;
            if was_unpinned {
                state.available -= 1;
                state.policy.set_candidate(id, false);
            }
            state.policy.record_access(id);
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(self.handle(&state, id, blk.clone()));
        }

        // Miss: reassign a victim.
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        let id = state.policy.select().ok_or(Error::PoolExhausted)?;
        debug_assert_eq!(state.slots[id.0].pins, 0, "policy selected a pinned slot");

        let loaded = (|| {
            self.write_back_if_modified(&state, id)?;
            // A slot unmapped on its last unpin (DropOnLastUnpin) may still
            // hold this block's only up-to-date image; write it back so the
            // reload below sees it.
            if let Some(stale) = state
                .slots
                .iter()
                .position(|s| s.block.as_ref() == Some(blk))
            {
                self.write_back_if_modified(&state, BufferId::new(stale))?;
            }
            self.store.read(blk)
        })();

        let page = match loaded {
            Ok(page) => page,
            Err(e) => {
                // Selection consumed candidacy; the slot is still unpinned
                // and, on a write-back failure, still consistently mapped.
                state.policy.set_candidate(id, true);
                return Err(e);
            }
        };
        self.stats.blocks_read.fetch_add(1, Ordering::Relaxed);

        Ok(self.commit_assignment(&mut state, id, blk.clone(), page))
    }

    /// Allocate a new block in `file_name` and pin a buffer to it.
    ///
    /// Never consults the residency map - the block does not exist yet.
    /// The freshly allocated block is initialized in place by `formatter`
    /// and the formatted image is written through the store, so the buffer
    /// starts clean.
    ///
    /// # Errors
    /// - [`Error::PoolExhausted`] if every buffer is pinned (the block is
    ///   not allocated in that case)
    /// - [`Error::Io`] from allocation or the initial write
    pub fn pin_new(
        &self,
        file_name: &str,
        formatter: &dyn PageFormatter,
    ) -> Result<PinnedBuffer<'_>> {
        let mut state = self.state.lock();

        let id = state.policy.select().ok_or(Error::PoolExhausted)?;
        debug_assert_eq!(state.slots[id.0].pins, 0, "policy selected a pinned slot");

        let prepared = (|| {
            self.write_back_if_modified(&state, id)?;

            let blk = self.store.allocate(file_name)?;
            let mut page = Page::new();
            formatter.format(&mut page);
            self.store.write(&blk, &page)?;
            self.stats.blocks_written.fetch_add(1, Ordering::Relaxed);
            Ok((blk, page))
        })();

        let (blk, page) = match prepared {
            Ok(v) => v,
            Err(e) => {
                state.policy.set_candidate(id, true);
                return Err(e);
            }
        };

        Ok(self.commit_assignment(&mut state, id, blk, page))
    }

    /// Unpin a buffer. Equivalent to dropping the handle.
    ///
    /// On the last unpin the slot becomes eligible for victim selection;
    /// its content and assignment stay in place until eviction (see
    /// [`Retention`] for the mapping).
    pub fn unpin(&self, buffer: PinnedBuffer<'_>) {
        drop(buffer);
    }

    // ========================================================================
    // Public API: flushing
    // ========================================================================

    /// Write back every buffer dirtied by `txn` and clear its marker.
    ///
    /// Buffers modified by other transactions, and pin counts and the
    /// residency map, are untouched.
    ///
    /// # Errors
    /// - [`Error::Io`] from the store; remaining buffers keep their markers
    pub fn flush_all(&self, txn: TxnId) -> Result<()> {
        let state = self.state.lock();

        for slot in &state.slots {
            let Some(block) = slot.block.as_ref() else {
                continue;
            };
            if slot.buf.modifying_txn() != Some(txn) {
                continue;
            }

            let page = slot.buf.page();
            self.store.write(block, &page)?;
            drop(page);

            slot.buf.clear_modified();
            self.stats.blocks_written.fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }

    // ========================================================================
    // Public API: introspection
    // ========================================================================

    /// Number of buffers with pin count zero.
    pub fn available(&self) -> usize {
        self.state.lock().available
    }

    /// Number of slots in the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pin count of the buffer `blk` is resident in, or `None` if the block
    /// is not in the residency map.
    pub fn pin_count(&self, blk: &BlockId) -> Option<u32> {
        let state = self.state.lock();
        state.resident.get(blk).map(|&id| state.slots[id.0].pins)
    }

    /// Check whether `blk` is in the residency map.
    pub fn contains(&self, blk: &BlockId) -> bool {
        self.state.lock().resident.contains_key(blk)
    }

    /// Number of blocks currently in the residency map.
    pub fn resident_count(&self) -> usize {
        self.state.lock().resident.len()
    }

    /// Buffer pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// The block store this pool loads from and flushes to.
    pub fn store(&self) -> &Arc<FileBlockStore> {
        &self.store
    }

    // ========================================================================
    // Internal: called by PinnedBuffer on drop
    // ========================================================================

    pub(crate) fn release(&self, id: BufferId) {
        let mut state = self.state.lock();

        debug_assert!(state.slots[id.0].pins > 0, "pin count underflow");
        state.slots[id.0].pins -= 1;

        if state.slots[id.0].pins == 0 {
            state.available += 1;
            state.policy.set_candidate(id, true);

            if state.retention == Retention::DropOnLastUnpin {
                // Forget residency on the last unpin. Assignment and dirty
                // marker stay on the slot so flushes and eviction
                // write-back still see it.
                if let Some(blk) = state.slots[id.0].block.clone() {
                    if state.resident.get(&blk) == Some(&id) {
                        state.resident.remove(&blk);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Internal: miss-path helpers
    // ========================================================================

    /// Write a slot's content back if its buffer is dirty.
    ///
    /// Holds the page read guard for the duration of the store write.
    fn write_back_if_modified(&self, state: &PoolState, id: BufferId) -> Result<()> {
        let slot = &state.slots[id.0];
        let Some(block) = slot.block.as_ref() else {
            return Ok(());
        };
        if !slot.buf.is_modified() {
            return Ok(());
        }

        let page = slot.buf.page();
        self.store.write(block, &page)?;
        drop(page);

        slot.buf.clear_modified();
        self.stats.blocks_written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Commit a victim's reassignment: retire the old mapping, install the
    /// new content, mapping and pin. Infallible by construction - all I/O
    /// happened before this point.
    fn commit_assignment<'p>(
        &'p self,
        state: &mut PoolState,
        id: BufferId,
        blk: BlockId,
        page: Page,
    ) -> PinnedBuffer<'p> {
        if let Some(old) = state.slots[id.0].block.take() {
            // Under DropOnLastUnpin the map entry for `old` may already
            // belong to another slot; only remove our own.
            if state.resident.get(&old) == Some(&id) {
                state.resident.remove(&old);
            }
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }

        *state.slots[id.0].buf.page_mut() = page;
        state.slots[id.0].block = Some(blk.clone());
        state.slots[id.0].pins = 1;
        state.available -= 1;
        state.resident.insert(blk.clone(), id);
        state.policy.record_access(id);

        self.handle(state, id, blk)
    }

    fn handle<'p>(&'p self, state: &PoolState, id: BufferId, blk: BlockId) -> PinnedBuffer<'p> {
        PinnedBuffer::new(self, id, blk, Arc::clone(&state.slots[id.0].buf))
    }
}
