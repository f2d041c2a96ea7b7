//! blockpool - a buffer pool manager for disk-backed storage engines.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Callers (transaction / scan layer)         │
//! │            pin · pin_new · unpin · flush_all            │
//! └────────────────────────────┬────────────────────────────┘
//!                              ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Buffer Pool (buffer/)                   │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │  Victim policies: FirstFit │ ClockSweep           │  │
//! │  │            (swappable at construction)            │  │
//! │  └───────────────────────────────────────────────────┘  │
//! │        BufferPool + Buffer + PinnedBuffer + Stats       │
//! └────────────────────────────┬────────────────────────────┘
//!                              ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │                Storage Layer (storage/)                 │
//! │               FileBlockStore + Page                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! A fixed number of in-memory buffers is multiplexed across a much larger
//! set of on-disk blocks. Callers pin a block to make it resident, read and
//! write the buffer's page while holding the pin, mark it with the modifying
//! transaction, and unpin; `flush_all(txn)` forces a transaction's changes to
//! disk. When every buffer is pinned, pinning fails immediately with
//! [`Error::PoolExhausted`] - waiting is the caller's policy, not the pool's.
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, BufferId, TxnId, Error, config)
//! - [`buffer`] - Buffer pool, pin handles and victim-selection policies
//! - [`storage`] - Block I/O and the in-memory block image
//!
//! # Quick Start
//! ```no_run
//! use std::sync::Arc;
//! use blockpool::{BufferPool, FileBlockStore, TxnId, ZeroFormatter};
//!
//! let store = Arc::new(FileBlockStore::open("mydb")?);
//! let pool = BufferPool::new(8, Arc::clone(&store));
//!
//! let buf = pool.pin_new("users.tbl", &ZeroFormatter)?;
//! buf.page_mut().write_string(0, "first record");
//! buf.mark_modified(TxnId::new(1));
//! drop(buf);
//!
//! pool.flush_all(TxnId::new(1))?;
//! # Ok::<(), blockpool::Error>(())
//! ```

// Core modules
pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::BLOCK_SIZE;
pub use common::{BlockId, BufferId, Error, Result, TxnId};

pub use buffer::{
    Buffer, BufferPool, PageFormatter, PinnedBuffer, PoolOptions, PoolStats, Retention,
    StatsSnapshot, ZeroFormatter,
};
pub use storage::{FileBlockStore, Page};
