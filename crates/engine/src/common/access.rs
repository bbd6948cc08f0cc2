//! Observed memory reference events.

/// A single memory reference observed by the engine.
///
/// Produced by the surrounding cache/memory harness, consumed once per
/// access; predictors copy what they need into their own storage and
/// never retain the event itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Address of the instruction performing the reference.
    pub pc: u64,
    /// Referenced memory address.
    pub addr: u64,
    /// Whether the reference missed in the cache.
    pub miss: bool,
}

impl Access {
    /// Creates a new access event.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the referencing instruction.
    /// * `addr` - Referenced memory address.
    /// * `miss` - Whether the reference missed in the cache.
    pub fn new(pc: u64, addr: u64, miss: bool) -> Self {
        Self { pc, addr, miss }
    }
}
