//! Chained access history and key index.
//!
//! The structural substrate of the delta-correlation predictor:
//! 1. **History Buffer:** A bounded circular log of past accesses. Each
//!    entry links backward to the previous entry sharing its correlation
//!    key, forming singly linked, backward-only chains through shared
//!    storage.
//! 2. **Key Index:** A bounded table binding a correlation key to the
//!    head of its chain. Linear-scan lookup, FIFO insertion.
//!
//! Both structures overwrite silently when full. Chain links are
//! sequence numbers rather than raw slot indices: once the history wraps
//! and recycles a slot, links into it resolve to "no further history"
//! instead of to an unrelated newer entry, so a chain can never cross
//! into another key's accesses.

use crate::common::RingBuffer;
use crate::config::LookupPolicy;

/// One logged access in the history buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Referenced address.
    pub address: u64,
    /// Sequence number of the previous entry sharing the same key, or
    /// `None` at the start of a chain.
    pub previous: Option<u64>,
}

/// Bounded circular log of accesses with per-key backward chains.
#[derive(Clone, Debug)]
pub struct HistoryBuffer {
    entries: RingBuffer<HistoryEntry>,
}

impl HistoryBuffer {
    /// Creates a history buffer with the given capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entries retained before FIFO overwrite.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
        }
    }

    /// Appends an entry and returns its sequence number.
    ///
    /// # Arguments
    ///
    /// * `address` - Referenced address.
    /// * `previous` - Sequence of the prior entry on the same chain.
    pub fn push(&mut self, address: u64, previous: Option<u64>) -> u64 {
        self.entries.push(HistoryEntry { address, previous })
    }

    /// Resolves a sequence number to its entry, if still resident.
    ///
    /// Returns `None` once the slot has been recycled; chain walks treat
    /// that as "no further history".
    ///
    /// # Arguments
    ///
    /// * `seq` - Sequence number returned by [`Self::push`].
    pub fn get(&self, seq: u64) -> Option<&HistoryEntry> {
        self.entries.get(seq)
    }

    /// Sequence number of the newest entry, or `None` when empty.
    pub fn latest_seq(&self) -> Option<u64> {
        self.entries.latest_seq()
    }

    /// Number of entries currently resident.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A key-to-chain-head binding in the index.
#[derive(Clone, Debug, Default)]
struct Binding {
    key: u64,
    head: Option<u64>,
}

/// Bounded key index with linear-scan lookup and FIFO insertion.
///
/// Eviction is positional, not key-aware: inserting into a full table
/// overwrites whichever slot the FIFO cursor reaches next, regardless of
/// which key lives there. Under [`LookupPolicy::FirstSlot`] the scan
/// order is ascending slot index, which does not track recency; this
/// reproduces the reference hardware and is part of the observable
/// prediction stream. [`LookupPolicy::MostRecent`] scans newest-first
/// instead.
#[derive(Clone, Debug)]
pub struct IndexTable {
    bindings: RingBuffer<Binding>,
    policy: LookupPolicy,
}

impl IndexTable {
    /// Creates a key index with the given capacity and lookup policy.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of bindings retained before FIFO overwrite.
    /// * `policy` - Slot-scan order for lookups.
    pub fn new(capacity: usize, policy: LookupPolicy) -> Self {
        Self {
            bindings: RingBuffer::new(capacity),
            policy,
        }
    }

    /// Finds the slot bound to a key, honoring the lookup policy.
    ///
    /// # Arguments
    ///
    /// * `key` - Correlation key to look up.
    ///
    /// # Returns
    ///
    /// The slot index of the binding, or `None` if the key is absent.
    pub fn find(&self, key: u64) -> Option<usize> {
        let occupied = self.bindings.len();
        match self.policy {
            LookupPolicy::FirstSlot => {
                (0..occupied).find(|&slot| self.bindings.slot(slot).key == key)
            }
            LookupPolicy::MostRecent => (0..occupied)
                .map(|age| self.bindings.recent_index(age))
                .find(|&slot| self.bindings.slot(slot).key == key),
        }
    }

    /// Inserts a fresh binding for a key with no chain head yet.
    ///
    /// Evicts the slot under the FIFO cursor when the table is full.
    ///
    /// # Arguments
    ///
    /// * `key` - Correlation key to bind.
    ///
    /// # Returns
    ///
    /// The slot index the binding landed in.
    pub fn insert(&mut self, key: u64) -> usize {
        let seq = self.bindings.push(Binding { key, head: None });
        (seq % self.bindings.capacity() as u64) as usize
    }

    /// Chain head bound at a slot.
    ///
    /// # Arguments
    ///
    /// * `slot` - Slot index returned by [`Self::find`] or [`Self::insert`].
    pub fn head(&self, slot: usize) -> Option<u64> {
        self.bindings.slot(slot).head
    }

    /// Updates the chain head bound at a slot.
    ///
    /// # Arguments
    ///
    /// * `slot` - Slot index returned by [`Self::find`] or [`Self::insert`].
    /// * `seq` - Sequence number of the new chain head.
    pub fn set_head(&mut self, slot: usize, seq: u64) {
        self.bindings.slot_mut(slot).head = Some(seq);
    }

    /// Number of bindings currently resident.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no binding has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
