//! Bounded circular storage.
//!
//! Every fixed-capacity structure in the engine is a ring with FIFO
//! overwrite: the global history buffer, the key index, the per-entry
//! delta rings, the shared address history, and the sliding comparison
//! buffer used during delta correlation. This module provides the single
//! abstraction they all share. It offers:
//! 1. **Modular reads:** `recent(age)` indexes backwards from the newest
//!    slot; slots that were never written observe `T::default()`.
//! 2. **Sequence-checked reads:** every push is numbered; `get(seq)`
//!    refuses to resolve a sequence whose slot has since been recycled,
//!    so a stale link into overwritten storage reads as absent instead
//!    of as an unrelated newer value.

/// A fixed-capacity circular buffer with FIFO overwrite.
///
/// Slots are pre-filled with `T::default()` at construction, matching
/// the zero-initialized tables of the hardware structures this models.
/// The buffer never grows; once `capacity` values have been pushed, each
/// further push silently overwrites the oldest slot.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    pushes: u64,
}

impl<T: Clone + Default> RingBuffer<T> {
    /// Creates a ring buffer with the given capacity.
    ///
    /// A capacity of zero is coerced to one so that index arithmetic
    /// stays total.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of slots in the ring.
    pub fn new(capacity: usize) -> Self {
        let safe_capacity = if capacity == 0 { 1 } else { capacity };
        Self {
            slots: vec![T::default(); safe_capacity],
            pushes: 0,
        }
    }

    /// Returns the number of slots in the ring.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots holding a pushed value.
    ///
    /// Saturates at `capacity` once the ring has wrapped.
    pub fn len(&self) -> usize {
        self.pushes.min(self.slots.len() as u64) as usize
    }

    /// Returns `true` if nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.pushes == 0
    }

    /// Returns the total number of pushes performed over the lifetime
    /// of the buffer.
    pub fn pushes(&self) -> u64 {
        self.pushes
    }

    /// Pushes a value, overwriting the oldest slot once full.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to store.
    ///
    /// # Returns
    ///
    /// The sequence number assigned to the value. Sequence numbers are
    /// monotonically increasing and can be resolved with [`Self::get`]
    /// until the slot is recycled.
    pub fn push(&mut self, value: T) -> u64 {
        let seq = self.pushes;
        let slot = (seq % self.slots.len() as u64) as usize;
        self.slots[slot] = value;
        self.pushes += 1;
        seq
    }

    /// Returns the sequence number of the most recently pushed value,
    /// or `None` if the buffer is empty.
    pub fn latest_seq(&self) -> Option<u64> {
        self.pushes.checked_sub(1)
    }

    /// Reads a slot by age, where age 0 is the newest slot.
    ///
    /// The read is purely modular: ages larger than the push count wrap
    /// around and observe default-initialized or recycled slots, exactly
    /// like reads of a zeroed hardware table.
    ///
    /// # Arguments
    ///
    /// * `age` - Distance backwards from the newest slot.
    pub fn recent(&self, age: usize) -> &T {
        let capacity = self.slots.len() as i128;
        let pos = (i128::from(self.pushes) - 1 - age as i128).rem_euclid(capacity);
        &self.slots[pos as usize]
    }

    /// Resolves a sequence number to its value, if still resident.
    ///
    /// # Arguments
    ///
    /// * `seq` - A sequence number previously returned by [`Self::push`].
    ///
    /// # Returns
    ///
    /// `Some(&T)` while the slot still holds the value pushed as `seq`;
    /// `None` once the slot has been overwritten (or if `seq` was never
    /// issued).
    pub fn get(&self, seq: u64) -> Option<&T> {
        if seq >= self.pushes || self.pushes - seq > self.slots.len() as u64 {
            return None;
        }
        Some(&self.slots[(seq % self.slots.len() as u64) as usize])
    }

    /// Reads a slot by raw index. Only indices below `len()` hold
    /// pushed values.
    ///
    /// # Arguments
    ///
    /// * `index` - Slot index in `[0, capacity)`.
    pub fn slot(&self, index: usize) -> &T {
        &self.slots[index]
    }

    /// Mutable access to a slot by raw index.
    ///
    /// # Arguments
    ///
    /// * `index` - Slot index in `[0, capacity)`.
    pub fn slot_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }

    /// Returns the slot index holding the value at the given age.
    ///
    /// # Arguments
    ///
    /// * `age` - Distance backwards from the newest slot.
    pub fn recent_index(&self, age: usize) -> usize {
        let capacity = self.slots.len() as i128;
        (i128::from(self.pushes) - 1 - age as i128).rem_euclid(capacity) as usize
    }
}
