//! Prefetch prediction strategies.
//!
//! This module contains the interface and implementations of the
//! engine's predictors. Each strategy observes the access stream
//! through the same interface and emits candidate addresses for the
//! admission filter:
//! 1. **Delta correlation:** chained global history with per-key delta matching.
//! 2. **DCPT:** per-key quantized delta rings with two-delta window replay.
//! 3. **Pattern table:** scored fixed-window delta patterns over a shared history.

/// Chained history buffer and key index (delta-correlation substrate).
pub mod history;

/// Global-history delta-correlation predictor.
pub mod delta_correlation;

/// Delta-Correlating Prediction Tables predictor.
pub mod dcpt;

/// Generalized pattern-table predictor.
pub mod pattern_table;

pub use self::dcpt::DcptPredictor;
pub use self::delta_correlation::DeltaCorrelationPredictor;
pub use self::history::{HistoryBuffer, HistoryEntry, IndexTable};
pub use self::pattern_table::PatternTablePredictor;

use crate::common::Access;

/// Trait for prefetch prediction strategies.
///
/// Predictors observe each memory access, update their internal
/// structures, and emit zero or more candidate addresses. Candidates are
/// screened by the admission filter before anything is requested; a
/// predictor never talks to the memory system directly.
pub trait Predictor: Send + Sync {
    /// Observes a memory access and generates prefetch candidates.
    ///
    /// Called once per access, in arrival order. Replaying an identical
    /// access sequence from a fresh predictor must reproduce identical
    /// candidates.
    ///
    /// # Arguments
    ///
    /// * `access` - The observed memory reference.
    ///
    /// # Returns
    ///
    /// Candidate addresses in nearest-future-first order. Empty when the
    /// predictor has nothing to offer for this access.
    fn observe(&mut self, access: &Access) -> Vec<u64>;

    /// Sets the prefetch degree (candidates emitted per trigger).
    ///
    /// A degree of zero disables emission entirely.
    ///
    /// # Arguments
    ///
    /// * `degree` - The new degree.
    fn set_degree(&mut self, degree: usize);

    /// Returns the current prefetch degree.
    fn degree(&self) -> usize;
}
