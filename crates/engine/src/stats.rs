//! Prefetch statistics accumulation and reporting.
//!
//! This module tracks the per-interval feedback that drives degree
//! calibration. It provides:
//! 1. **Counters:** Demand reads, demand hits, completed prefetches, and
//!    hits attributed to prefetched blocks.
//! 2. **Rates:** Fixed-point hit rates scaled by [`RATE_FACTOR`].
//! 3. **Reset:** Interval lifecycle management for the degree controller.

/// Fixed-point scale applied to all rate computations.
///
/// Rates are integers in `[0, RATE_FACTOR]`; a rate of `RATE_FACTOR`
/// means every counted read hit.
pub const RATE_FACTOR: i64 = 1_000_000;

/// Hit-rate statistics accumulated over one calibration interval.
///
/// All counters are seeded at 1, never 0. This makes every rate
/// computation total (no division by zero is reachable regardless of the
/// access history) and is relied upon throughout the engine; it is not
/// an incidental default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessStats {
    /// Demand reads observed.
    pub reads: i64,
    /// Demand reads that hit in the cache.
    pub read_hits: i64,
    /// Prefetches that completed (became resident).
    pub issued: i64,
    /// Demand hits on blocks that were brought in by a prefetch.
    pub issued_hits: i64,
}

impl Default for AccessStats {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessStats {
    /// Creates a fresh statistics record with all counters seeded at 1.
    pub fn new() -> Self {
        Self {
            reads: 1,
            read_hits: 1,
            issued: 1,
            issued_hits: 1,
        }
    }

    /// Resets all counters back to their seed value of 1.
    ///
    /// Called at engine start and after every calibration.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Demand hit rate over the current interval, scaled by
    /// [`RATE_FACTOR`].
    pub fn hit_rate(&self) -> i64 {
        self.read_hits * RATE_FACTOR / self.reads
    }

    /// Hit rate of prefetched blocks over the current interval, scaled
    /// by [`RATE_FACTOR`].
    pub fn issued_hit_rate(&self) -> i64 {
        self.issued_hits * RATE_FACTOR / self.issued
    }

    /// Prints the accumulated counters and derived rates to stdout.
    pub fn print(&self) {
        println!("==========================================");
        println!("PREFETCH ENGINE STATISTICS");
        println!("==========================================");
        println!("reads                {}", self.reads - 1);
        println!("read_hits            {}", self.read_hits - 1);
        println!("prefetches_completed {}", self.issued - 1);
        println!("prefetched_hits      {}", self.issued_hits - 1);
        println!(
            "hit_rate             {:.4}",
            self.hit_rate() as f64 / RATE_FACTOR as f64
        );
        println!(
            "issued_hit_rate      {:.4}",
            self.issued_hit_rate() as f64 / RATE_FACTOR as f64
        );
        println!("==========================================");
    }
}
