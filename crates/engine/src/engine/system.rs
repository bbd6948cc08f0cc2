//! Memory-system interface seen by the engine.

/// Trait for the memory system the engine issues prefetches into.
///
/// The engine only queries state and requests fetches through this
/// interface; cache organization, request queues, and timing all live on
/// the other side of it. Implementations range from full simulators to
/// the stub used in tests.
pub trait MemorySystem {
    /// Returns `true` if the block containing `address` is resident in
    /// the cache.
    ///
    /// # Arguments
    ///
    /// * `address` - The physical address to query.
    fn is_cached(&self, address: u64) -> bool;

    /// Returns `true` if a fetch of the block containing `address` is
    /// already outstanding.
    ///
    /// # Arguments
    ///
    /// * `address` - The physical address to query.
    fn is_in_flight(&self, address: u64) -> bool;

    /// Number of memory requests currently outstanding.
    fn outstanding_requests(&self) -> usize;

    /// Maximum number of requests that may be outstanding at once.
    fn max_outstanding_requests(&self) -> usize;

    /// One past the highest prefetchable physical address.
    fn max_physical_address(&self) -> u64;

    /// Requests an asynchronous fetch of the block containing `address`.
    ///
    /// The system reports completion back to the engine via
    /// [`PrefetchEngine::on_prefetch_completed`].
    ///
    /// [`PrefetchEngine::on_prefetch_completed`]: crate::engine::PrefetchEngine::on_prefetch_completed
    ///
    /// # Arguments
    ///
    /// * `address` - The physical address to fetch.
    fn issue_prefetch(&mut self, address: u64);
}
