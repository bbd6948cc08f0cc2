//! Generalized pattern-table predictor.
//!
//! Keeps a shared fixed-depth history of recent addresses (independent
//! of instruction) and a fixed-capacity table of scored delta patterns.
//! Each pattern spans a *match window* (the most recent deltas) followed
//! by a *predict window* (the deltas that came next).
//!
//! On every access the current window of deltas is rebuilt from the
//! shared history. A pad-and-shift copy (predict slots zeroed, match
//! slots holding the newest deltas) is scored against every stored
//! pattern by prefix run length; the best partial match, if any, has its
//! predict-window deltas projected forward from the newest address. The
//! raw window is then either matched exactly (incrementing that stored
//! pattern's score) or installed over the lowest-scoring entry. All
//! scores decay periodically so stale patterns lose replacement ties.

use super::Predictor;
use crate::common::{Access, RingBuffer};
use crate::config::PatternConfig;

/// A stored delta pattern with its reinforcement score.
#[derive(Clone, Debug, Default)]
struct Pattern {
    score: i64,
    jumps: Vec<i64>,
}

/// Pattern-table predictor state.
#[derive(Clone, Debug)]
pub struct PatternTablePredictor {
    history: RingBuffer<u64>,
    patterns: Vec<Pattern>,
    match_window: usize,
    predict_window: usize,
    aging_period: u64,
    access_count: u64,
    degree: usize,
}

impl PatternTablePredictor {
    /// Creates a new pattern-table predictor.
    ///
    /// # Arguments
    ///
    /// * `config` - History depth, table geometry, and aging period.
    /// * `degree` - Initial prefetch degree.
    pub fn new(config: &PatternConfig, degree: usize) -> Self {
        let span = config.match_window + config.predict_window;
        Self {
            history: RingBuffer::new(config.history_depth),
            patterns: vec![
                Pattern {
                    score: 0,
                    jumps: vec![0; span],
                };
                config.table_size
            ],
            match_window: config.match_window,
            predict_window: config.predict_window,
            aging_period: config.aging_factor * config.table_size as u64,
            access_count: 0,
            degree,
        }
    }

    /// Current scores of all stored patterns, by slot.
    ///
    /// Diagnostic view used by replacement/aging instrumentation and
    /// tests.
    pub fn scores(&self) -> Vec<i64> {
        self.patterns.iter().map(|p| p.score).collect()
    }

    /// Rebuilds the current pattern from the shared history, oldest
    /// delta first, with score 1.
    fn current_pattern(&self) -> Pattern {
        let span = self.match_window + self.predict_window;
        let mut jumps = vec![0_i64; span];
        for (i, jump) in jumps.iter_mut().enumerate() {
            let age = span - 1 - i;
            *jump =
                (*self.history.recent(age) as i64).wrapping_sub(*self.history.recent(age + 1) as i64);
        }
        Pattern { score: 1, jumps }
    }

    /// Shifts the newest `match_window` deltas into the match slots and
    /// zeroes the predict slots.
    fn pad(&self, pattern: &Pattern) -> Pattern {
        let span = pattern.jumps.len();
        let padding = self.predict_window;
        let mut jumps = vec![0_i64; span];
        for i in 0..span - padding {
            jumps[i] = pattern.jumps[i + padding];
        }
        Pattern {
            score: pattern.score,
            jumps,
        }
    }

    /// Best partial match of the padded current pattern.
    ///
    /// Each stored pattern scores its prefix run length against the
    /// match window, multiplied by the current pattern's score (always
    /// 1, so only the run length decides). The first strictly best
    /// entry wins.
    fn best_match(&self, padded: &Pattern) -> (Option<usize>, i64) {
        let mut best_id = None;
        let mut best_score = 0;
        for (id, stored) in self.patterns.iter().enumerate() {
            let mut run = 0_i64;
            for j in 0..self.match_window {
                if padded.jumps[j] == stored.jumps[j] {
                    run += 1;
                } else {
                    break;
                }
            }
            let score = run * padded.score;
            if score > best_score {
                best_id = Some(id);
                best_score = score;
            }
        }
        (best_id, best_score)
    }

    /// Slot of the first stored pattern equal to the raw current
    /// pattern across the full window, if any.
    fn find_exact(&self, raw: &Pattern) -> Option<usize> {
        self.patterns
            .iter()
            .position(|stored| stored.jumps == raw.jumps)
    }

    /// Slot of the lowest-scoring stored pattern (first on ties).
    fn worst(&self) -> usize {
        let mut worst_id = 0;
        let mut worst_score = self.patterns[0].score;
        for (id, stored) in self.patterns.iter().enumerate().skip(1) {
            if stored.score < worst_score {
                worst_score = stored.score;
                worst_id = id;
            }
        }
        worst_id
    }

    /// Scores, projects, and installs for the current access.
    ///
    /// Projection is held back until the shared history holds a full
    /// window of real deltas; before that, the zero deltas read from
    /// unwritten history slots would prefix-match zero-initialized table
    /// entries. Installation is not held back, so warm-up accesses still
    /// populate the table.
    fn check(&mut self) -> Vec<u64> {
        let span = self.match_window + self.predict_window;
        let warm = self.history.pushes() > span as u64;
        let raw = self.current_pattern();
        let padded = self.pad(&raw);

        let (best_id, best_score) = self.best_match(&padded);
        let mut out = Vec::new();
        if warm && best_score > 1 {
            if let Some(id) = best_id {
                let mut address = *self.history.recent(0);
                for j in self.match_window..span {
                    address = address.wrapping_add_signed(self.patterns[id].jumps[j]);
                    out.push(address);
                }
            }
        }
        out.truncate(self.degree);

        match self.find_exact(&raw) {
            Some(id) => self.patterns[id].score += 1,
            None => {
                let victim = self.worst();
                self.patterns[victim] = raw;
            }
        }
        out
    }

    /// Decrements every stored score by one.
    fn age(&mut self) {
        for pattern in &mut self.patterns {
            pattern.score -= 1;
        }
    }
}

impl Predictor for PatternTablePredictor {
    /// Logs the address into the shared history, runs the pattern
    /// check, and ages the table on period boundaries.
    ///
    /// # Arguments
    ///
    /// * `access` - The observed memory reference.
    ///
    /// # Returns
    ///
    /// Up to `degree` candidates (at most one per predict slot),
    /// nearest-future first.
    fn observe(&mut self, access: &Access) -> Vec<u64> {
        let _seq = self.history.push(access.addr);
        let out = self.check();

        self.access_count = (self.access_count + 1) % self.aging_period;
        if self.access_count == 0 {
            self.age();
        }
        out
    }

    fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
    }

    fn degree(&self) -> usize {
        self.degree
    }
}
