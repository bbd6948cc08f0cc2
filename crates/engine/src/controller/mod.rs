//! Adaptive prefetch degree controllers.
//!
//! This module contains the interface and implementations of the
//! calibration policies that tune how aggressively the engine
//! prefetches. Every policy reads the hit-rate statistics accumulated
//! over one calibration interval and may adjust the degree:
//! 1. **Fixed:** no adaptation; the interval only resets statistics.
//! 2. **Hill climb:** hysteretic exploration with per-degree block counters.
//! 3. **Probe:** three-point probing with countdown hysteresis.

/// Hysteretic hill-climb policy.
pub mod hill_climb;

/// Three-probe explorer policy.
pub mod probe;

pub use self::hill_climb::HillClimbController;
pub use self::probe::ProbeController;

use crate::stats::AccessStats;

/// Trait for degree calibration policies.
///
/// Controllers are invoked once per calibration interval with the
/// statistics accumulated since the previous invocation; the engine
/// resets the statistics afterwards. The degree must stay within
/// `[0, max_degree]` after every invocation, and a just-constructed
/// controller's first invocation only seeds bookkeeping.
pub trait DegreeController: Send + Sync {
    /// Consumes one interval's statistics and possibly moves the degree.
    ///
    /// # Arguments
    ///
    /// * `stats` - Counters accumulated over the elapsed interval.
    fn calibrate(&mut self, stats: &AccessStats);

    /// Returns the degree the engine should operate at until the next
    /// calibration.
    fn degree(&self) -> usize;
}

/// Non-adaptive controller holding a constant degree.
///
/// Matches the baseline calibrator of the reference design, whose
/// interval handler only reported rates and reset counters.
#[derive(Debug, Clone)]
pub struct FixedController {
    degree: usize,
}

impl FixedController {
    /// Creates a controller pinned at the given degree.
    ///
    /// # Arguments
    ///
    /// * `degree` - The constant degree to report.
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }
}

impl DegreeController for FixedController {
    fn calibrate(&mut self, stats: &AccessStats) {
        tracing::debug!(
            degree = self.degree,
            hit_rate = stats.hit_rate(),
            issued_hit_rate = stats.issued_hit_rate(),
            "calibration (fixed degree)"
        );
    }

    fn degree(&self) -> usize {
        self.degree
    }
}
