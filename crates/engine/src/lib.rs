//! A hardware prefetch prediction engine.
//!
//! This crate models the prediction side of a data prefetcher: it
//! observes a stream of demand memory accesses, recognizes repeating
//! delta patterns, and emits candidate addresses to fetch ahead of
//! demand. Three prediction strategies are provided (global-history
//! delta correlation, delta-correlating prediction tables, and a
//! generalized pattern table), along with degree controllers that adapt
//! prefetch aggressiveness to the observed hit rate and an admission
//! filter that screens candidates against memory-system state.
//!
//! The crate is organized as follows:
//! - [`engine`]: the orchestrating [`PrefetchEngine`], admission filter,
//!   and the [`MemorySystem`] trait it issues into.
//! - [`predictor`]: the three prediction strategies behind one trait.
//! - [`controller`]: fixed, hill-climb, and probe degree policies.
//! - [`config`]: JSON-loadable configuration with validation.
//! - [`stats`]: interval hit-rate statistics driving calibration.
//! - [`common`]: the access record and the ring buffer underlying every
//!   history structure.
//!
//! # Example
//!
//! ```no_run
//! use prefetch_core::{Access, Config, PrefetchEngine};
//!
//! # struct Memory;
//! # impl prefetch_core::MemorySystem for Memory {
//! #     fn is_cached(&self, _: u64) -> bool { false }
//! #     fn is_in_flight(&self, _: u64) -> bool { false }
//! #     fn outstanding_requests(&self) -> usize { 0 }
//! #     fn max_outstanding_requests(&self) -> usize { 8 }
//! #     fn max_physical_address(&self) -> u64 { 1 << 32 }
//! #     fn issue_prefetch(&mut self, _: u64) {}
//! # }
//! # fn main() -> Result<(), prefetch_core::config::ConfigError> {
//! let config = Config::default();
//! let mut engine = PrefetchEngine::new(&config)?;
//! let mut memory = Memory;
//!
//! engine.on_access(&Access::new(0x400_100, 0x8000_0000, true), &mut memory);
//! # Ok(())
//! # }
//! ```

/// Shared primitives: the access record and the ring buffer.
pub mod common;

/// Configuration structures, defaults, and validation.
pub mod config;

/// Adaptive prefetch degree controllers.
pub mod controller;

/// The orchestrating engine, admission filter, and memory-system trait.
pub mod engine;

/// Prefetch prediction strategies.
pub mod predictor;

/// Interval hit-rate statistics.
pub mod stats;

pub use self::common::Access;
pub use self::config::Config;
pub use self::engine::{MemorySystem, PrefetchEngine};
