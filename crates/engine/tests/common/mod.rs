//! Shared infrastructure for the engine test suite.


use prefetch_core::{Access, PrefetchEngine};

use self::mocks::StubMemorySystem;

/// Replays a stream of accesses through an engine, completing every
/// issued prefetch immediately after the access that produced it.
///
/// Immediate completion keeps the resident set deterministic: a
/// candidate admitted on access `n` is visible to the admission checks
/// of access `n + 1`.
pub fn drive(engine: &mut PrefetchEngine, system: &mut StubMemorySystem, accesses: &[Access]) {
    for access in accesses {
        engine.on_access(access, system);
        for address in system.drain_in_flight() {
            engine.on_prefetch_completed(address);
        }
    }
}

/// Builds a miss-only access stream at a constant stride.
///
/// # Arguments
///
/// * `pc` - Instruction address shared by every access.
/// * `base` - Address of the first access.
/// * `stride` - Byte distance between consecutive accesses.
/// * `count` - Number of accesses to generate.
pub fn stride_stream(pc: u64, base: u64, stride: u64, count: usize) -> Vec<Access> {
    (0..count as u64)
        .map(|i| Access::new(pc, base + stride * i, true))
        .collect()
}
