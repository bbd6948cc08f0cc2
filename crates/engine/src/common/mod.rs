//! Common types shared across the engine.
//!
//! This module provides the building blocks used by every predictor and
//! controller:
//! 1. **Access Events:** The memory reference record handed in by the harness.
//! 2. **Circular Storage:** The bounded ring buffer behind every fixed-capacity table.

/// Observed memory reference events.
pub mod access;

/// Bounded circular storage.
pub mod ring;

pub use access::Access;
pub use ring::RingBuffer;
