//! Hysteretic hill-climb degree controller.
//!
//! Moves the degree one step at a time and judges each move by whether
//! the demand hit rate rose or fell by more than a relative margin over
//! the following interval. Verdicts block regions of the degree range
//! for a fixed number of intervals: a rewarded increase blocks
//! re-decreasing below the new degree, a punished increase blocks
//! climbing past it, and symmetrically for decreases. Exploration
//! resumes for a degree once its block counter runs out; upward
//! exploration wins when both neighbors are unblocked.

use super::DegreeController;
use crate::config::HillClimbConfig;
use crate::stats::AccessStats;

/// The direction of the previous degree move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Raised,
    Held,
    Lowered,
}

/// Hill-climb controller state.
#[derive(Debug, Clone)]
pub struct HillClimbController {
    degree: usize,
    max_degree: usize,
    action: Action,
    last_hit_rate: i64,
    /// Remaining blocked intervals, indexed by degree.
    blocked: Vec<i32>,
    block_intervals: i32,
    margin_percent: i64,
    seeded: bool,
}

impl HillClimbController {
    /// Creates a new hill-climb controller.
    ///
    /// # Arguments
    ///
    /// * `degree` - Starting degree.
    /// * `max_degree` - Upper bound on the degree.
    /// * `config` - Block duration and hit-rate margin.
    pub fn new(degree: usize, max_degree: usize, config: &HillClimbConfig) -> Self {
        Self {
            degree: degree.min(max_degree),
            max_degree,
            action: Action::Held,
            last_hit_rate: 0,
            blocked: vec![0; max_degree + 1],
            block_intervals: config.block_intervals,
            margin_percent: config.margin_percent,
            seeded: false,
        }
    }

    fn block(&mut self, degrees: impl Iterator<Item = usize>) {
        for d in degrees {
            self.blocked[d] = self.block_intervals;
        }
    }
}

impl DegreeController for HillClimbController {
    /// Judges the previous move, blocks the losing region, and picks
    /// the next move.
    ///
    /// The very first invocation only seeds the block counters and
    /// takes no tuning action.
    fn calibrate(&mut self, stats: &AccessStats) {
        if !self.seeded {
            let initial = self.block_intervals;
            self.blocked.fill(initial);
            self.seeded = true;
            return;
        }

        let hit_rate = stats.hit_rate();
        let better = hit_rate > self.last_hit_rate * (100 + self.margin_percent) / 100;
        let worse = hit_rate < self.last_hit_rate * (100 - self.margin_percent) / 100;

        match self.action {
            Action::Raised => {
                if better {
                    self.block(0..self.degree);
                }
                if worse {
                    self.block(self.degree..=self.max_degree);
                }
            }
            Action::Lowered => {
                if better {
                    self.block(self.degree + 1..=self.max_degree);
                }
                if worse {
                    self.block(0..=self.degree);
                }
            }
            Action::Held => {}
        }

        self.action = Action::Held;
        if self.degree < self.max_degree && self.blocked[self.degree + 1] <= 0 {
            self.action = Action::Raised;
        } else if self.degree > 0 && self.blocked[self.degree - 1] <= 0 {
            self.action = Action::Lowered;
        }

        for counter in &mut self.blocked {
            *counter -= 1;
        }

        let old_degree = self.degree;
        self.degree = match self.action {
            Action::Raised => (self.degree + 1).min(self.max_degree),
            Action::Lowered => self.degree.saturating_sub(1),
            Action::Held => self.degree,
        };
        self.last_hit_rate = hit_rate;

        tracing::debug!(
            old_degree,
            new_degree = self.degree,
            hit_rate,
            better,
            worse,
            "hill-climb calibration"
        );
    }

    fn degree(&self) -> usize {
        self.degree
    }
}
