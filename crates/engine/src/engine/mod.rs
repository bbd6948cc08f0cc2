//! The prefetch engine.
//!
//! This module contains the orchestration layer tying the pieces
//! together. It provides:
//! 1. **Engine:** per-access flow from demand stream to issued prefetches.
//! 2. **Admission filter:** usefulness screening of predictor candidates.
//! 3. **Memory-system trait:** the engine's only view of the outside world.
//!
//! All engine state lives inside [`PrefetchEngine`]; two engines in the
//! same process never share anything.

/// Admission filtering of predictor candidates.
pub mod filter;

/// Memory-system interface.
pub mod system;

pub use self::filter::AdmissionFilter;
pub use self::system::MemorySystem;

use std::collections::HashSet;
use std::fmt;

use crate::common::Access;
use crate::config::{Config, ConfigError, ControllerKind, PredictorKind};
use crate::controller::{DegreeController, FixedController, HillClimbController, ProbeController};
use crate::predictor::{DcptPredictor, DeltaCorrelationPredictor, PatternTablePredictor, Predictor};
use crate::stats::AccessStats;

/// The prefetch prediction engine.
///
/// Owns one predictor, one degree controller, the admission filter, and
/// the interval statistics. Drive it with [`on_access`] for every demand
/// reference and [`on_prefetch_completed`] when an issued fetch lands;
/// calibration fires automatically every `calibration_interval` accesses.
///
/// [`on_access`]: PrefetchEngine::on_access
/// [`on_prefetch_completed`]: PrefetchEngine::on_prefetch_completed
pub struct PrefetchEngine {
    stats: AccessStats,
    predictor: Box<dyn Predictor>,
    controller: Box<dyn DegreeController>,
    filter: AdmissionFilter,
    /// Block tags brought in by prefetch, pending attribution. A tag is
    /// cleared by the next demand access to its block; leftovers are
    /// dropped at calibration.
    prefetched: HashSet<u64>,
    block_mask: u64,
    calibration_interval: u64,
    access_count: u64,
}

impl PrefetchEngine {
    /// Builds an engine from a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine, predictor, and controller parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration violates a
    /// structural invariant.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let degree = config.initial_degree;
        let predictor: Box<dyn Predictor> = match config.predictor {
            PredictorKind::DeltaCorrelation => Box::new(DeltaCorrelationPredictor::new(
                &config.delta_correlation,
                degree,
            )),
            PredictorKind::Dcpt => Box::new(DcptPredictor::new(&config.dcpt, degree)),
            PredictorKind::PatternTable => {
                Box::new(PatternTablePredictor::new(&config.pattern, degree))
            }
        };
        let controller: Box<dyn DegreeController> = match config.controller {
            ControllerKind::Fixed => Box::new(FixedController::new(degree)),
            ControllerKind::HillClimb => Box::new(HillClimbController::new(
                degree,
                config.max_degree,
                &config.hill_climb,
            )),
            ControllerKind::Probe => Box::new(ProbeController::new(
                degree,
                config.max_degree,
                &config.probe,
            )),
        };

        tracing::info!(
            predictor = ?config.predictor,
            controller = ?config.controller,
            degree,
            interval = config.calibration_interval,
            "prefetch engine initialized"
        );

        Ok(Self {
            stats: AccessStats::new(),
            predictor,
            controller,
            filter: AdmissionFilter::new(),
            prefetched: HashSet::new(),
            block_mask: !(config.block_bytes as u64 - 1),
            calibration_interval: config.calibration_interval,
            access_count: 0,
        })
    }

    fn block_tag(&self, address: u64) -> u64 {
        address & self.block_mask
    }

    /// Processes one demand memory access.
    ///
    /// Updates hit statistics (attributing hits on prefetched blocks),
    /// feeds the access to the predictor, screens every candidate
    /// through the admission filter, and issues the survivors into the
    /// memory system. Every `calibration_interval` accesses the degree
    /// controller runs and the interval statistics reset.
    ///
    /// # Arguments
    ///
    /// * `access` - The demand reference.
    /// * `system` - The memory system to screen against and issue into.
    pub fn on_access(&mut self, access: &Access, system: &mut dyn MemorySystem) {
        self.stats.reads += 1;
        // Any demand access to the block clears its tag; a miss means the
        // prefetched copy is gone, so only a hit attributes.
        let was_prefetched = self.prefetched.remove(&self.block_tag(access.addr));
        if !access.miss {
            self.stats.read_hits += 1;
            if was_prefetched {
                self.stats.issued_hits += 1;
            }
        }

        let candidates = self.predictor.observe(access);
        for candidate in candidates {
            if self.filter.should_issue(candidate, system) {
                tracing::trace!(
                    pc = access.pc,
                    addr = access.addr,
                    candidate,
                    "issuing prefetch"
                );
                system.issue_prefetch(candidate);
            }
        }

        self.access_count += 1;
        if self.access_count % self.calibration_interval == 0 {
            self.calibrate();
        }
    }

    /// Records the completion of a previously issued prefetch.
    ///
    /// The block becomes eligible for hit attribution: the next demand
    /// access to it consumes the tag, counting as a prefetched hit when
    /// that access is a hit.
    ///
    /// # Arguments
    ///
    /// * `address` - The address whose fetch completed.
    pub fn on_prefetch_completed(&mut self, address: u64) {
        let tag = self.block_tag(address);
        let _newly = self.prefetched.insert(tag);
        self.stats.issued += 1;
    }

    /// Runs one calibration: the controller consumes the interval
    /// statistics, the predictor takes the (possibly moved) degree, and
    /// the statistics reset. Tags for prefetched blocks that never saw a
    /// demand access are dropped with them, keeping the tag set bounded
    /// by one interval's issue volume.
    fn calibrate(&mut self) {
        self.controller.calibrate(&self.stats);
        self.predictor.set_degree(self.controller.degree());
        self.stats.reset();
        self.prefetched.clear();
    }

    /// The interval statistics accumulated since the last calibration.
    pub fn stats(&self) -> &AccessStats {
        &self.stats
    }

    /// The prefetch degree currently in effect.
    pub fn degree(&self) -> usize {
        self.controller.degree()
    }
}

impl fmt::Debug for PrefetchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefetchEngine")
            .field("degree", &self.controller.degree())
            .field("stats", &self.stats)
            .field("pending_tags", &self.prefetched.len())
            .field("block_mask", &format_args!("{:#x}", self.block_mask))
            .field("calibration_interval", &self.calibration_interval)
            .field("access_count", &self.access_count)
            .finish_non_exhaustive()
    }
}
