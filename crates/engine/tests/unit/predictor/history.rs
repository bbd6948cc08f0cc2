//! History Buffer and Key Index Tests.
//!
//! Verifies the chained-history substrate of the delta-correlation
//! predictor: backward links through shared circular storage, the
//! end-of-chain behavior of recycled slots, and the two index lookup
//! policies.

use prefetch_core::config::LookupPolicy;
use prefetch_core::predictor::{HistoryBuffer, IndexTable};

// ══════════════════════════════════════════════════════════
// 1. Chain construction
// ══════════════════════════════════════════════════════════

/// Entries link backward through their recorded predecessors.
#[test]
fn chain_walks_backward_through_links() {
    let mut history = HistoryBuffer::new(8);
    let a = history.push(0x1000, None);
    let b = history.push(0x1040, Some(a));
    let c = history.push(0x1080, Some(b));

    let entry = history.get(c).unwrap();
    assert_eq!(entry.address, 0x1080);
    let entry = history.get(entry.previous.unwrap()).unwrap();
    assert_eq!(entry.address, 0x1040);
    let entry = history.get(entry.previous.unwrap()).unwrap();
    assert_eq!(entry.address, 0x1000);
    assert_eq!(entry.previous, None, "Chain start carries no link");
}

/// Interleaved keys keep separate chains through the shared storage.
#[test]
fn interleaved_chains_stay_separate() {
    let mut history = HistoryBuffer::new(8);
    let a0 = history.push(0x1000, None);
    let b0 = history.push(0x9000, None);
    let a1 = history.push(0x1040, Some(a0));
    let b1 = history.push(0x9100, Some(b0));

    assert_eq!(history.get(a1).unwrap().previous, Some(a0));
    assert_eq!(history.get(b1).unwrap().previous, Some(b0));
    assert_eq!(history.get(a0).unwrap().address, 0x1000);
    assert_eq!(history.get(b0).unwrap().address, 0x9000);
}

// ══════════════════════════════════════════════════════════
// 2. Wraparound safety
// ══════════════════════════════════════════════════════════

/// A link into a recycled slot reads as end-of-chain, never as the
/// unrelated entry now occupying the storage.
#[test]
fn recycled_link_is_end_of_chain() {
    let mut history = HistoryBuffer::new(4);
    let a0 = history.push(0x1000, None);
    let a1 = history.push(0x1040, Some(a0));

    // Four pushes from another key recycle both of key A's slots.
    let mut prev = None;
    for i in 0..4_u64 {
        prev = Some(history.push(0x9000 + i * 0x100, prev));
    }

    assert_eq!(history.get(a1), None, "Overwritten entry must not resolve");
    assert_eq!(history.get(a0), None);
    // Key B's chain is intact.
    let entry = history.get(prev.unwrap()).unwrap();
    assert_eq!(entry.address, 0x9300);
}

// ══════════════════════════════════════════════════════════
// 3. Key index lookup policies
// ══════════════════════════════════════════════════════════

/// First-slot lookup returns the lowest-indexed binding for a key.
#[test]
fn first_slot_lookup_ignores_recency() {
    let mut index = IndexTable::new(4, LookupPolicy::FirstSlot);
    let early = index.insert(7);
    index.insert(8);
    // Force a duplicate binding for key 7 in a later slot.
    let late = index.insert(7);
    assert_ne!(early, late);

    index.set_head(early, 10);
    index.set_head(late, 99);
    let found = index.find(7).unwrap();
    assert_eq!(found, early);
    assert_eq!(index.head(found), Some(10));
}

/// Most-recent lookup prefers the freshest binding for a key.
#[test]
fn most_recent_lookup_prefers_freshest() {
    let mut index = IndexTable::new(4, LookupPolicy::MostRecent);
    let early = index.insert(7);
    index.insert(8);
    let late = index.insert(7);

    index.set_head(early, 10);
    index.set_head(late, 99);
    let found = index.find(7).unwrap();
    assert_eq!(found, late);
    assert_eq!(index.head(found), Some(99));
}

/// Insertion into a full index evicts positionally, regardless of key.
#[test]
fn full_index_evicts_by_position() {
    let mut index = IndexTable::new(2, LookupPolicy::FirstSlot);
    index.insert(1);
    index.insert(2);
    // Third insert wraps to slot 0, evicting key 1.
    let slot = index.insert(3);
    assert_eq!(slot, 0);
    assert_eq!(index.find(1), None);
    assert!(index.find(2).is_some());
    assert!(index.find(3).is_some());
}

/// An absent key is not found, and a fresh binding has no chain head.
#[test]
fn fresh_binding_has_no_head() {
    let mut index = IndexTable::new(4, LookupPolicy::FirstSlot);
    assert_eq!(index.find(5), None);
    let slot = index.insert(5);
    assert_eq!(index.head(slot), None);
}
