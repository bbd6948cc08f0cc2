//! Global-history delta-correlation predictor.
//!
//! A GHB PC/DC-style predictor: every access is appended to a shared
//! history buffer and linked backward to the previous access with the
//! same correlation key (instruction address, or coarsened address
//! zone). Prediction walks the chain backward, reconstructing the delta
//! stream, and looks for the most recent point where the newest
//! `match_window` deltas repeat. On a hit, the deltas that followed the
//! earlier occurrence are replayed forward from the latest address to
//! produce `degree` candidates.
//!
//! Chain walks are bounded twice: by the start-of-chain sentinel and by
//! a fixed lookback count. A link into recycled history storage reads as
//! end-of-chain, never as another key's data.

use super::Predictor;
use super::history::{HistoryBuffer, IndexTable};
use crate::common::{Access, RingBuffer};
use crate::config::{DeltaCorrelationConfig, KeySource};

/// Delta-correlation predictor state.
#[derive(Clone, Debug)]
pub struct DeltaCorrelationPredictor {
    history: HistoryBuffer,
    index: IndexTable,
    match_window: usize,
    lookback: usize,
    misses_only: bool,
    key: KeySource,
    zone_bits: u32,
    degree: usize,
}

impl DeltaCorrelationPredictor {
    /// Creates a new delta-correlation predictor.
    ///
    /// # Arguments
    ///
    /// * `config` - Table geometry and keying parameters.
    /// * `degree` - Initial prefetch degree.
    pub fn new(config: &DeltaCorrelationConfig, degree: usize) -> Self {
        Self {
            history: HistoryBuffer::new(config.history_size),
            index: IndexTable::new(config.index_size, config.lookup),
            match_window: config.match_window,
            lookback: config.lookback,
            misses_only: config.misses_only,
            key: config.key,
            zone_bits: config.zone_bits,
            degree,
        }
    }

    /// Correlation key for an access, per the configured key source.
    fn correlation_key(&self, access: &Access) -> u64 {
        match self.key {
            KeySource::Pc => access.pc,
            KeySource::Zone => access.addr >> self.zone_bits,
        }
    }

    /// Appends an access to its key's chain and returns the new head.
    fn record(&mut self, key: u64, address: u64) -> u64 {
        let slot = self
            .index
            .find(key)
            .unwrap_or_else(|| self.index.insert(key));
        let previous = self.index.head(slot);
        let seq = self.history.push(address, previous);
        self.index.set_head(slot, seq);
        seq
    }

    /// Walks the newest chain backward and projects a repeating delta
    /// subsequence forward.
    ///
    /// The first `match_window` deltas encountered (the newest) form the
    /// reference pattern. A sliding buffer of `degree + match_window`
    /// deltas is maintained during the walk; once full, its newest
    /// `match_window` entries are compared against the reference at
    /// every step. On the first exact match, the `degree` deltas beyond
    /// the matched window are accumulated onto the latest address, each
    /// candidate building on the previous one.
    fn correlate(&self) -> Vec<u64> {
        if self.degree == 0 {
            return Vec::new();
        }
        let Some(head) = self.history.latest_seq() else {
            return Vec::new();
        };
        let Some(latest) = self.history.get(head) else {
            return Vec::new();
        };

        let window = self.degree + self.match_window;
        let mut buffer: RingBuffer<i64> = RingBuffer::new(window);
        let mut reference: Vec<i64> = Vec::with_capacity(self.match_window);
        let mut address = latest.address;
        let mut current = head;

        for step in 0..self.lookback {
            let Some(entry) = self.history.get(current) else {
                break;
            };
            let Some(prev_seq) = entry.previous else {
                break;
            };
            let Some(prev) = self.history.get(prev_seq) else {
                // Link into recycled storage: treat as end of chain.
                break;
            };

            let delta = (entry.address as i64).wrapping_sub(prev.address as i64);
            let _seq = buffer.push(delta);
            if step < self.match_window {
                reference.push(delta);
            }

            if step + 1 >= window {
                let matched = (0..self.match_window)
                    .all(|k| *buffer.recent(k) == reference[self.match_window - 1 - k]);
                if matched {
                    let mut candidates = Vec::with_capacity(self.degree);
                    for k in 0..self.degree {
                        let jump = *buffer.recent(self.match_window + k);
                        address = address.wrapping_add_signed(jump);
                        candidates.push(address);
                    }
                    return candidates;
                }
            }

            current = prev_seq;
        }
        Vec::new()
    }
}

impl Predictor for DeltaCorrelationPredictor {
    /// Records the access into its chain, then correlates.
    ///
    /// With `misses_only` set, cache hits are neither recorded nor
    /// correlated. A degree of zero skips correlation entirely.
    ///
    /// # Arguments
    ///
    /// * `access` - The observed memory reference.
    ///
    /// # Returns
    ///
    /// Up to `degree` candidate addresses, furthest-future last.
    fn observe(&mut self, access: &Access) -> Vec<u64> {
        if self.misses_only && !access.miss {
            return Vec::new();
        }
        let key = self.correlation_key(access);
        let _head = self.record(key, access.addr);
        self.correlate()
    }

    fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
    }

    fn degree(&self) -> usize {
        self.degree
    }
}
