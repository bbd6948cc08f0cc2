//! A scriptable memory-system stand-in.

use std::collections::HashSet;

use prefetch_core::MemorySystem;

/// Block size assumed by the stub's residency tracking.
pub const BLOCK_BYTES: u64 = 64;

/// A memory system with fully scriptable state.
///
/// Residency and in-flight tracking are block-granular. Every issued
/// prefetch is recorded verbatim in `issued` for assertion, and parks
/// its block in the in-flight set until [`drain_in_flight`] moves it to
/// the resident set.
///
/// [`drain_in_flight`]: StubMemorySystem::drain_in_flight
pub struct StubMemorySystem {
    /// Block tags currently resident.
    pub resident: HashSet<u64>,
    /// Block tags with an outstanding fetch.
    pub in_flight: HashSet<u64>,
    /// Every prefetch address issued, in order.
    pub issued: Vec<u64>,
    /// One past the highest prefetchable address.
    pub max_address: u64,
    /// Request-queue capacity.
    pub max_outstanding: usize,
}

impl StubMemorySystem {
    /// Creates a stub with an empty cache and a roomy request queue.
    pub fn new() -> Self {
        Self {
            resident: HashSet::new(),
            in_flight: HashSet::new(),
            issued: Vec::new(),
            max_address: 1 << 40,
            max_outstanding: 64,
        }
    }

    fn block_tag(address: u64) -> u64 {
        address & !(BLOCK_BYTES - 1)
    }

    /// Marks the block containing `address` resident.
    pub fn insert_resident(&mut self, address: u64) {
        self.resident.insert(Self::block_tag(address));
    }

    /// Marks the block containing `address` as having an outstanding
    /// fetch.
    pub fn insert_in_flight(&mut self, address: u64) {
        self.in_flight.insert(Self::block_tag(address));
    }

    /// Completes every outstanding fetch, moving its block into the
    /// resident set.
    ///
    /// # Returns
    ///
    /// The block tags that just became resident, for reporting back to
    /// the engine as completed prefetches.
    pub fn drain_in_flight(&mut self) -> Vec<u64> {
        let completed: Vec<u64> = self.in_flight.drain().collect();
        for &tag in &completed {
            self.resident.insert(tag);
        }
        completed
    }
}

impl Default for StubMemorySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySystem for StubMemorySystem {
    fn is_cached(&self, address: u64) -> bool {
        self.resident.contains(&Self::block_tag(address))
    }

    fn is_in_flight(&self, address: u64) -> bool {
        self.in_flight.contains(&Self::block_tag(address))
    }

    fn outstanding_requests(&self) -> usize {
        self.in_flight.len()
    }

    fn max_outstanding_requests(&self) -> usize {
        self.max_outstanding
    }

    fn max_physical_address(&self) -> u64 {
        self.max_address
    }

    fn issue_prefetch(&mut self, address: u64) {
        self.issued.push(address);
        self.in_flight.insert(Self::block_tag(address));
    }
}
