//! Three-probe explorer degree controller.
//!
//! Measures the hit rate over one interval each at the current degree,
//! one below it, and one above it, then settles on whichever probe
//! scored highest. The choice is held for a countdown before the next
//! probing round: short if the choice moved, long if it repeated, which
//! damps oscillation on noisy workloads. Probes that would leave
//! `[0, max_degree]` are skipped and score -1 so they can never win.

use super::DegreeController;
use crate::config::ProbeConfig;
use crate::stats::AccessStats;

/// Phase of the probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Record the score at the current degree.
    CheckCurrent,
    /// Record the score one degree below.
    CheckLower,
    /// Record the score one degree above.
    CheckHigher,
    /// Pick the best-scoring probe and start the hold.
    Choose,
    /// Hold the chosen degree until the countdown expires.
    Countdown,
}

/// Probe controller state.
#[derive(Debug, Clone)]
pub struct ProbeController {
    degree: usize,
    max_degree: usize,
    phase: Phase,
    score_lower: i64,
    score_current: i64,
    score_higher: i64,
    previous_choice: Option<usize>,
    countdown: u32,
    countdown_short: u32,
    countdown_long: u32,
    seeded: bool,
}

impl ProbeController {
    /// Creates a new probe controller.
    ///
    /// # Arguments
    ///
    /// * `degree` - Starting degree.
    /// * `max_degree` - Upper bound on the degree.
    /// * `config` - Short and long hold durations.
    pub fn new(degree: usize, max_degree: usize, config: &ProbeConfig) -> Self {
        Self {
            degree: degree.min(max_degree),
            max_degree,
            phase: Phase::CheckCurrent,
            score_lower: -1,
            score_current: -1,
            score_higher: -1,
            previous_choice: None,
            countdown: 0,
            countdown_short: config.countdown_short,
            countdown_long: config.countdown_long,
            seeded: false,
        }
    }

    fn raise(&mut self, steps: usize) {
        self.degree = (self.degree + steps).min(self.max_degree);
    }
}

impl DegreeController for ProbeController {
    /// Advances the probe cycle by one interval.
    ///
    /// The very first invocation only seeds bookkeeping and takes no
    /// tuning action.
    fn calibrate(&mut self, stats: &AccessStats) {
        if !self.seeded {
            self.seeded = true;
            return;
        }

        let score = stats.hit_rate();
        match self.phase {
            Phase::CheckCurrent => {
                self.score_current = score;
                if self.degree == 0 {
                    // No lower neighbor to probe.
                    self.score_lower = -1;
                    self.raise(1);
                    self.phase = Phase::CheckHigher;
                } else {
                    self.degree -= 1;
                    self.phase = Phase::CheckLower;
                }
            }
            Phase::CheckLower => {
                self.score_lower = score;
                if self.degree + 2 > self.max_degree {
                    // No higher neighbor to probe; return to current.
                    self.score_higher = -1;
                    self.raise(1);
                    self.phase = Phase::Choose;
                } else {
                    self.raise(2);
                    self.phase = Phase::CheckHigher;
                }
            }
            Phase::CheckHigher => {
                self.score_higher = score;
                self.degree = self.degree.saturating_sub(1);
                self.phase = Phase::Choose;
            }
            Phase::Choose => {
                if self.score_higher > self.score_current && self.score_higher > self.score_lower {
                    self.raise(1);
                }
                if self.score_lower > self.score_current && self.score_lower > self.score_higher {
                    self.degree = self.degree.saturating_sub(1);
                }

                self.countdown = if self.previous_choice == Some(self.degree) {
                    self.countdown_long
                } else {
                    self.countdown_short
                };
                self.previous_choice = Some(self.degree);
                self.phase = Phase::Countdown;

                tracing::debug!(
                    degree = self.degree,
                    score_lower = self.score_lower,
                    score_current = self.score_current,
                    score_higher = self.score_higher,
                    countdown = self.countdown,
                    "probe choice"
                );
            }
            Phase::Countdown => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    self.phase = Phase::CheckCurrent;
                }
            }
        }
    }

    fn degree(&self) -> usize {
        self.degree
    }
}
