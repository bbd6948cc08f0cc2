//! Configuration system for the prefetch engine.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the engine. It provides:
//! 1. **Defaults:** Baseline hardware constants (table sizes, windows, intervals).
//! 2. **Structures:** Hierarchical config for the engine, each predictor, and each controller policy.
//! 3. **Enums:** Predictor, controller, correlation-key, and index-lookup selection.
//!
//! Configuration is supplied via JSON (`Config::from_json` /
//! `Config::from_file`) or built in code starting from `Config::default()`.

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the engine.
///
/// These values define the baseline table geometry when not explicitly
/// overridden. They are sized for an 8 KiB hardware budget, matching the
/// structures the engine models.
mod defaults {
    /// Accesses between two controller invocations.
    pub const CALIBRATION_INTERVAL: u64 = 1024;

    /// Upper bound on the prefetch degree.
    pub const MAX_DEGREE: usize = 4;

    /// Degree the engine starts at before any calibration.
    pub const INITIAL_DEGREE: usize = 1;

    /// Cache block size in bytes; prefetch-tag bookkeeping is
    /// block-granular.
    pub const BLOCK_BYTES: usize = 64;

    /// History buffer capacity (delta-correlation predictor).
    pub const HISTORY_SIZE: usize = 1024;

    /// Key index capacity (delta-correlation predictor).
    pub const INDEX_SIZE: usize = 512;

    /// Consecutive deltas that must repeat for a correlation hit.
    pub const MATCH_WINDOW: usize = 2;

    /// Maximum chain entries walked per correlation attempt.
    pub const LOOKBACK: usize = 64;

    /// Address bits discarded when keying by correlation zone.
    pub const ZONE_BITS: u32 = 16;

    /// DCPT table capacity.
    ///
    /// 180 rows of 16 deltas fit the 8 KiB budget (344 bits per row).
    pub const DCPT_TABLE_SIZE: usize = 180;

    /// Deltas retained per DCPT entry.
    pub const DCPT_RING_SIZE: usize = 16;

    /// Bits of signed storage per quantized delta.
    pub const DCPT_DELTA_BITS: u32 = 16;

    /// Low-order delta bits discarded during quantization.
    pub const DCPT_DISCARD_BITS: u32 = 4;

    /// Shared address history depth (pattern-table predictor).
    pub const PATTERN_HISTORY_DEPTH: usize = 8;

    /// Pattern table capacity.
    pub const PATTERN_TABLE_SIZE: usize = 256;

    /// Deltas in a pattern's match window.
    pub const PATTERN_MATCH_WINDOW: usize = 4;

    /// Deltas in a pattern's predict window.
    pub const PATTERN_PREDICT_WINDOW: usize = 2;

    /// Aging period multiplier: scores decay every
    /// `aging_factor * table_size` accesses.
    pub const PATTERN_AGING_FACTOR: u64 = 2;

    /// Intervals a degree stays blocked after a hill-climb verdict.
    pub const BLOCK_INTERVALS: i32 = 8;

    /// Relative hit-rate margin (percent) separating "better"/"worse"
    /// from noise.
    pub const MARGIN_PERCENT: i64 = 3;

    /// Probe-controller hold time after a changed degree choice.
    pub const COUNTDOWN_SHORT: u32 = 2;

    /// Probe-controller hold time after a repeated degree choice.
    pub const COUNTDOWN_LONG: u32 = 16;
}

/// Prefetch prediction strategies.
///
/// Selects which predictor the engine constructs; all strategies share
/// the same observe-and-emit interface and degree parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PredictorKind {
    /// Global-history delta correlation (GHB PC/DC style).
    ///
    /// Walks a per-key backward chain through a shared history buffer
    /// and projects a repeating delta subsequence forward.
    #[default]
    DeltaCorrelation,
    /// Delta-Correlating Prediction Tables.
    ///
    /// Per-key ring of quantized deltas; replays the deltas that
    /// historically followed the most recent two.
    #[serde(alias = "DCPT")]
    Dcpt,
    /// Generalized pattern table.
    ///
    /// Scored store of fixed-window delta patterns over a shared
    /// address history, aged periodically.
    PatternTable,
}

/// Degree calibration policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ControllerKind {
    /// No adaptation; the degree stays at its initial value and
    /// calibration only resets interval statistics.
    #[default]
    Fixed,
    /// Hysteretic hill climbing with per-degree block counters.
    HillClimb,
    /// Three-probe explorer with countdown hysteresis.
    Probe,
}

/// Source of the correlation key grouping history chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeySource {
    /// Key by the referencing instruction address.
    #[default]
    Pc,
    /// Key by coarsened address zone (`addr >> zone_bits`).
    Zone,
}

/// Key index lookup policies.
///
/// The reference hardware scans the index by ascending slot and returns
/// the first match, which does not track recency: after wraparound a
/// stale binding can win over a fresher one. That behavior is preserved
/// as the default and kept overridable, since it is part of the
/// observable prediction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum LookupPolicy {
    /// First matching slot by ascending index (reference behavior).
    #[default]
    FirstSlot,
    /// Most recently inserted matching binding.
    MostRecent,
}

/// Delta-correlation predictor configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeltaCorrelationConfig {
    /// History buffer capacity.
    pub history_size: usize,
    /// Key index capacity.
    pub index_size: usize,
    /// Consecutive deltas that must repeat for a correlation hit.
    pub match_window: usize,
    /// Maximum chain entries walked per correlation attempt.
    pub lookback: usize,
    /// When `true`, only cache misses are recorded into the history.
    pub misses_only: bool,
    /// Correlation key source.
    pub key: KeySource,
    /// Address bits discarded when keying by zone.
    pub zone_bits: u32,
    /// Key index lookup policy.
    pub lookup: LookupPolicy,
}

impl Default for DeltaCorrelationConfig {
    fn default() -> Self {
        Self {
            history_size: defaults::HISTORY_SIZE,
            index_size: defaults::INDEX_SIZE,
            match_window: defaults::MATCH_WINDOW,
            lookback: defaults::LOOKBACK,
            misses_only: false,
            key: KeySource::default(),
            zone_bits: defaults::ZONE_BITS,
            lookup: LookupPolicy::default(),
        }
    }
}

/// DCPT predictor configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DcptConfig {
    /// Table capacity (one entry per tracked key).
    pub table_size: usize,
    /// Deltas retained per entry.
    pub ring_size: usize,
    /// Bits of signed storage per quantized delta; deltas outside the
    /// representable range are stored as a zero overflow marker.
    pub delta_bits: u32,
    /// Low-order bits discarded during quantization (block granularity).
    pub discard_bits: u32,
    /// When `true`, a replay run that reaches the last prefetched
    /// address discards all candidates accumulated so far.
    pub discard_at_last_prefetch: bool,
}

impl Default for DcptConfig {
    fn default() -> Self {
        Self {
            table_size: defaults::DCPT_TABLE_SIZE,
            ring_size: defaults::DCPT_RING_SIZE,
            delta_bits: defaults::DCPT_DELTA_BITS,
            discard_bits: defaults::DCPT_DISCARD_BITS,
            discard_at_last_prefetch: false,
        }
    }
}

/// Pattern-table predictor configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Shared address history depth; must exceed
    /// `match_window + predict_window`.
    pub history_depth: usize,
    /// Pattern table capacity.
    pub table_size: usize,
    /// Deltas in the match window.
    pub match_window: usize,
    /// Deltas in the predict window.
    pub predict_window: usize,
    /// Scores decay every `aging_factor * table_size` accesses.
    pub aging_factor: u64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            history_depth: defaults::PATTERN_HISTORY_DEPTH,
            table_size: defaults::PATTERN_TABLE_SIZE,
            match_window: defaults::PATTERN_MATCH_WINDOW,
            predict_window: defaults::PATTERN_PREDICT_WINDOW,
            aging_factor: defaults::PATTERN_AGING_FACTOR,
        }
    }
}

/// Hill-climb controller configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HillClimbConfig {
    /// Intervals a degree stays blocked after a verdict.
    pub block_intervals: i32,
    /// Relative hit-rate margin (percent) separating better/worse from
    /// noise.
    pub margin_percent: i64,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            block_intervals: defaults::BLOCK_INTERVALS,
            margin_percent: defaults::MARGIN_PERCENT,
        }
    }
}

/// Probe controller configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Hold time (in intervals) after a changed degree choice.
    pub countdown_short: u32,
    /// Hold time (in intervals) after a repeated degree choice.
    pub countdown_long: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            countdown_short: defaults::COUNTDOWN_SHORT,
            countdown_long: defaults::COUNTDOWN_LONG,
        }
    }
}

/// Root configuration for the prefetch engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active prediction strategy.
    pub predictor: PredictorKind,
    /// Active calibration policy.
    pub controller: ControllerKind,
    /// Accesses between two controller invocations.
    pub calibration_interval: u64,
    /// Upper bound on the prefetch degree.
    pub max_degree: usize,
    /// Degree before any calibration has run.
    pub initial_degree: usize,
    /// Cache block size in bytes (power of two).
    pub block_bytes: usize,
    /// Delta-correlation predictor parameters.
    pub delta_correlation: DeltaCorrelationConfig,
    /// DCPT predictor parameters.
    pub dcpt: DcptConfig,
    /// Pattern-table predictor parameters.
    pub pattern: PatternConfig,
    /// Hill-climb controller parameters.
    pub hill_climb: HillClimbConfig,
    /// Probe controller parameters.
    pub probe: ProbeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictor: PredictorKind::default(),
            controller: ControllerKind::default(),
            calibration_interval: defaults::CALIBRATION_INTERVAL,
            max_degree: defaults::MAX_DEGREE,
            initial_degree: defaults::INITIAL_DEGREE,
            block_bytes: defaults::BLOCK_BYTES,
            delta_correlation: DeltaCorrelationConfig::default(),
            dcpt: DcptConfig::default(),
            pattern: PatternConfig::default(),
            hill_climb: HillClimbConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A structural parameter that must be non-zero was zero.
    #[error("{0} must be greater than zero")]
    ZeroField(&'static str),

    /// `block_bytes` must be a power of two for block masking.
    #[error("block_bytes ({0}) must be a power of two")]
    BlockBytes(usize),

    /// The initial degree exceeds the configured maximum.
    #[error("initial_degree ({initial}) exceeds max_degree ({max})")]
    DegreeRange {
        /// Configured initial degree.
        initial: usize,
        /// Configured maximum degree.
        max: usize,
    },

    /// The pattern history is too shallow for the configured windows.
    #[error(
        "pattern history_depth ({depth}) must exceed match_window ({match_window}) \
         plus predict_window ({predict_window})"
    )]
    HistoryTooShallow {
        /// Configured history depth.
        depth: usize,
        /// Configured match window.
        match_window: usize,
        /// Configured predict window.
        predict_window: usize,
    },

    /// The DCPT delta ring cannot hold a search window.
    #[error("dcpt ring_size ({0}) must be at least 3")]
    RingTooSmall(usize),

    /// Quantized deltas need at least a sign bit and a magnitude bit,
    /// and must fit the storage word.
    #[error("dcpt delta_bits ({0}) must be between 2 and 31")]
    DeltaBits(u32),

    /// The quantization shift must leave representable address bits.
    #[error("dcpt discard_bits ({0}) must be below 32")]
    DiscardBits(u32),

    /// Zone keying must discard fewer than the full address width.
    #[error("zone_bits ({0}) must be below 64")]
    ZoneBits(u32),

    /// The configuration could not be parsed from JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// Parses and validates a configuration from a JSON string.
    ///
    /// # Arguments
    ///
    /// * `text` - JSON document; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document does not parse or the
    /// resulting configuration is structurally invalid.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, does not
    /// parse, or is structurally invalid.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Validates the structural invariants of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calibration_interval == 0 {
            return Err(ConfigError::ZeroField("calibration_interval"));
        }
        if self.block_bytes == 0 || !self.block_bytes.is_power_of_two() {
            return Err(ConfigError::BlockBytes(self.block_bytes));
        }
        if self.initial_degree > self.max_degree {
            return Err(ConfigError::DegreeRange {
                initial: self.initial_degree,
                max: self.max_degree,
            });
        }

        let dc = &self.delta_correlation;
        if dc.history_size == 0 {
            return Err(ConfigError::ZeroField("delta_correlation.history_size"));
        }
        if dc.index_size == 0 {
            return Err(ConfigError::ZeroField("delta_correlation.index_size"));
        }
        if dc.match_window == 0 {
            return Err(ConfigError::ZeroField("delta_correlation.match_window"));
        }
        if dc.lookback == 0 {
            return Err(ConfigError::ZeroField("delta_correlation.lookback"));
        }
        if dc.zone_bits >= 64 {
            return Err(ConfigError::ZoneBits(dc.zone_bits));
        }

        if self.dcpt.table_size == 0 {
            return Err(ConfigError::ZeroField("dcpt.table_size"));
        }
        if self.dcpt.ring_size < 3 {
            return Err(ConfigError::RingTooSmall(self.dcpt.ring_size));
        }
        if !(2..=31).contains(&self.dcpt.delta_bits) {
            return Err(ConfigError::DeltaBits(self.dcpt.delta_bits));
        }
        if self.dcpt.discard_bits >= 32 {
            return Err(ConfigError::DiscardBits(self.dcpt.discard_bits));
        }

        let pattern = &self.pattern;
        if pattern.table_size == 0 {
            return Err(ConfigError::ZeroField("pattern.table_size"));
        }
        if pattern.match_window == 0 {
            return Err(ConfigError::ZeroField("pattern.match_window"));
        }
        if pattern.predict_window == 0 {
            return Err(ConfigError::ZeroField("pattern.predict_window"));
        }
        if pattern.aging_factor == 0 {
            return Err(ConfigError::ZeroField("pattern.aging_factor"));
        }
        if pattern.history_depth <= pattern.match_window + pattern.predict_window {
            return Err(ConfigError::HistoryTooShallow {
                depth: pattern.history_depth,
                match_window: pattern.match_window,
                predict_window: pattern.predict_window,
            });
        }

        Ok(())
    }
}
