//! Prefetch admission filtering.

use super::system::MemorySystem;

/// Screens predictor candidates against memory-system state.
///
/// A candidate is admitted only when fetching it could do useful work:
/// the block is not already resident, not already being fetched, lies
/// within physical memory, and the request queue has room. The filter
/// holds no state of its own; every decision is made from the system's
/// current view.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmissionFilter;

impl AdmissionFilter {
    /// Creates an admission filter.
    pub fn new() -> Self {
        Self
    }

    /// Decides whether a candidate address should be fetched.
    ///
    /// # Arguments
    ///
    /// * `address` - The candidate physical address.
    /// * `system` - The memory system to screen against.
    ///
    /// # Returns
    ///
    /// `true` if the candidate passes every admission check.
    pub fn should_issue(&self, address: u64, system: &dyn MemorySystem) -> bool {
        if address >= system.max_physical_address() {
            return false;
        }
        if system.is_cached(address) || system.is_in_flight(address) {
            return false;
        }
        system.outstanding_requests() < system.max_outstanding_requests()
    }
}
