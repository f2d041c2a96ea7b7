//! Property tests for buffer pool accounting.
//!
//! A random sequence of pin/unpin operations is replayed against a small
//! model; after every step the pool's available counter must equal
//! `capacity - distinct currently-pinned blocks`, exhaustion must occur
//! exactly when the model says so, and repeated pins of a pinned block must
//! land in the same slot.

use std::collections::HashSet;
use std::sync::Arc;

use blockpool::{BlockId, BufferPool, Error, FileBlockStore, PinnedBuffer};
use proptest::prelude::*;

const CAPACITY: usize = 4;
const BLOCKS: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Pin(usize),
    Unpin(prop::sample::Index),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..BLOCKS).prop_map(Op::Pin),
        any::<prop::sample::Index>().prop_map(Op::Unpin),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pin_accounting_matches_model(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileBlockStore::open(dir.path()).unwrap());
        let pool = BufferPool::new(CAPACITY, Arc::clone(&store));
        let blocks: Vec<BlockId> = (0..BLOCKS)
            .map(|_| store.allocate("data.tbl").unwrap())
            .collect();

        let mut held: Vec<PinnedBuffer<'_>> = Vec::new();

        for op in ops {
            match op {
                Op::Pin(i) => {
                    let blk = &blocks[i];
                    let pinned: HashSet<&BlockId> =
                        held.iter().map(|h| h.block()).collect();
                    let full = pinned.len() == CAPACITY && !pinned.contains(blk);

                    match pool.pin(blk) {
                        Ok(buf) => {
                            prop_assert!(!full, "pin of {} succeeded with pool full", blk);
                            if let Some(prev) = held.iter().find(|h| h.block() == blk) {
                                prop_assert_eq!(prev.id(), buf.id());
                            }
                            held.push(buf);
                        }
                        Err(Error::PoolExhausted) => {
                            prop_assert!(full, "spurious exhaustion pinning {}", blk);
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
                Op::Unpin(idx) => {
                    if !held.is_empty() {
                        let i = idx.index(held.len());
                        held.swap_remove(i);
                    }
                }
            }

            let distinct: HashSet<&BlockId> = held.iter().map(|h| h.block()).collect();
            prop_assert_eq!(pool.available(), CAPACITY - distinct.len());
        }
    }
}
