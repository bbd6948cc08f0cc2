//! Delta-Correlating Prediction Tables predictor.
//!
//! One table entry per tracked key (instruction address), each holding
//! the last referenced address and a fixed-size ring of quantized
//! deltas. Deltas are right-shifted to block granularity and clamped to
//! a signed range; a delta outside the range is stored as a zero
//! overflow marker, which breaks pattern continuity at that point.
//!
//! Prediction searches the ring for an earlier occurrence of the two
//! most recent deltas. On the first hit, the deltas that historically
//! followed that occurrence are replayed forward from the last address,
//! dequantized, producing candidates in nearest-future-first order.

use super::Predictor;
use crate::common::{Access, RingBuffer};
use crate::config::DcptConfig;

/// One tracked key in the DCPT table.
#[derive(Clone, Debug)]
struct DcptEntry {
    key: u64,
    last_address: u64,
    last_prefetch: u64,
    deltas: RingBuffer<i32>,
}

impl Default for DcptEntry {
    fn default() -> Self {
        Self {
            key: 0,
            last_address: 0,
            last_prefetch: 0,
            deltas: RingBuffer::new(1),
        }
    }
}

impl DcptEntry {
    fn fresh(key: u64, address: u64, ring_size: usize) -> Self {
        Self {
            key,
            last_address: address,
            last_prefetch: 0,
            deltas: RingBuffer::new(ring_size),
        }
    }
}

/// DCPT predictor state.
#[derive(Clone, Debug)]
pub struct DcptPredictor {
    table: RingBuffer<DcptEntry>,
    ring_size: usize,
    discard_bits: u32,
    delta_max: i64,
    discard_at_last_prefetch: bool,
    degree: usize,
}

impl DcptPredictor {
    /// Creates a new DCPT predictor.
    ///
    /// # Arguments
    ///
    /// * `config` - Table geometry and quantization parameters.
    /// * `degree` - Initial prefetch degree.
    pub fn new(config: &DcptConfig, degree: usize) -> Self {
        Self {
            table: RingBuffer::new(config.table_size),
            ring_size: config.ring_size,
            discard_bits: config.discard_bits,
            delta_max: (1_i64 << (config.delta_bits - 1)) - 1,
            discard_at_last_prefetch: config.discard_at_last_prefetch,
            degree,
        }
    }

    /// Searches an entry's ring for a repeat of the two newest deltas
    /// and replays the deltas that followed.
    ///
    /// Scanning starts at the second-oldest window position and stops at
    /// the first match. Replay walks from just past the matched window
    /// toward the present, dequantizing each delta onto the running
    /// address; a zero overflow marker ends the run early.
    fn candidates(
        entry: &DcptEntry,
        discard_bits: u32,
        discard_at_last_prefetch: bool,
    ) -> Vec<u64> {
        let newest = *entry.deltas.recent(0);
        let second = *entry.deltas.recent(1);
        if newest == 0 || second == 0 {
            return Vec::new();
        }

        let ring = entry.deltas.capacity();
        for i in 1..ring - 1 {
            if *entry.deltas.recent(i) == newest && *entry.deltas.recent(i + 1) == second {
                let mut out = Vec::new();
                let mut address = entry.last_address;
                for k in 0..i {
                    let delta = *entry.deltas.recent(i - k - 1);
                    if delta == 0 {
                        break;
                    }
                    address = address.wrapping_add_signed(i64::from(delta) << discard_bits);
                    out.push(address);
                    if discard_at_last_prefetch && address == entry.last_prefetch {
                        out.clear();
                    }
                }
                return out;
            }
        }
        Vec::new()
    }
}

impl Predictor for DcptPredictor {
    /// Updates the key's delta ring and replays any recognized pattern.
    ///
    /// A first-seen key allocates an entry (FIFO eviction) and emits
    /// nothing. A quantized delta of zero is a repeat access carrying no
    /// new information and leaves the entry untouched. An
    /// unrepresentable delta stores the overflow marker and emits
    /// nothing.
    ///
    /// # Arguments
    ///
    /// * `access` - The observed memory reference.
    ///
    /// # Returns
    ///
    /// Up to `degree` candidates, nearest-future first. The furthest
    /// emitted candidate is recorded as the entry's last prefetch.
    fn observe(&mut self, access: &Access) -> Vec<u64> {
        let found = (0..self.table.len()).find(|&slot| self.table.slot(slot).key == access.pc);
        let Some(slot) = found else {
            let _seq = self
                .table
                .push(DcptEntry::fresh(access.pc, access.addr, self.ring_size));
            return Vec::new();
        };

        let discard_bits = self.discard_bits;
        let delta_max = self.delta_max;
        let discard_at_last_prefetch = self.discard_at_last_prefetch;
        let degree = self.degree;

        let entry = self.table.slot_mut(slot);
        let raw = (access.addr as i64).wrapping_sub(entry.last_address as i64) >> discard_bits;

        if raw < -delta_max || raw > delta_max {
            // Overflow marker: breaks continuity at this point.
            let _seq = entry.deltas.push(0);
            entry.last_address = access.addr;
            return Vec::new();
        }
        if raw == 0 {
            return Vec::new();
        }

        let _seq = entry.deltas.push(raw as i32);
        entry.last_address = access.addr;

        let mut out = Self::candidates(entry, discard_bits, discard_at_last_prefetch);
        out.truncate(degree);
        if let Some(&furthest) = out.last() {
            entry.last_prefetch = furthest;
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
