//! Pattern-Table Predictor Tests.
//!
//! Verifies the scored pattern store over the shared address history:
//! warm-up, partial-match projection, exact-match reinforcement,
//! lowest-score eviction, and periodic aging.

use prefetch_core::common::Access;
use prefetch_core::config::PatternConfig;
use prefetch_core::predictor::{PatternTablePredictor, Predictor};

fn miss(addr: u64) -> Access {
    Access::new(0x400, addr, true)
}

/// A small table with aging pushed far out, for tests that want the
/// scores undisturbed.
fn slow_aging_config() -> PatternConfig {
    PatternConfig {
        table_size: 8,
        aging_factor: 1000,
        ..PatternConfig::default()
    }
}

// ══════════════════════════════════════════════════════════
// 1. Warm-up and projection
// ══════════════════════════════════════════════════════════

/// A linear stride stream starts predicting once the all-stride pattern
/// has been stored and recurs: with a four-delta match window that is
/// the eighth access.
#[test]
fn linear_stride_predicts_from_eighth_access() {
    let mut pf = PatternTablePredictor::new(&slow_aging_config(), 2);
    let stride = 64_u64;
    let base = 0x1_0000_u64;

    for i in 0..7_u64 {
        let out = pf.observe(&miss(base + i * stride));
        assert!(out.is_empty(), "Access {i} predicted before the pattern recurred");
    }

    let last = base + 7 * stride;
    let out = pf.observe(&miss(last));
    assert_eq!(out, vec![last + stride, last + 2 * stride]);
}

/// The zero deltas read from unwritten history slots must not
/// prefix-match the zero-initialized table: a cold predictor stays
/// silent until a full window of real deltas exists, whatever the
/// stream looks like.
#[test]
fn cold_history_never_projects() {
    let mut pf = PatternTablePredictor::new(&slow_aging_config(), 4);
    for i in 0..6_u64 {
        let out = pf.observe(&miss(0x5_0000 + i * 8));
        assert!(out.is_empty(), "Access {i} projected from unwritten history");
    }
}

/// The degree caps how many predict-window deltas are projected.
#[test]
fn degree_caps_projection() {
    let mut pf = PatternTablePredictor::new(&slow_aging_config(), 1);
    let stride = 64_u64;
    let base = 0x1_0000_u64;

    let mut out = Vec::new();
    for i in 0..9_u64 {
        out = pf.observe(&miss(base + i * stride));
    }
    assert_eq!(out.len(), 1, "Degree 1 projects a single candidate");
}

// ══════════════════════════════════════════════════════════
// 2. Reinforcement and eviction
// ══════════════════════════════════════════════════════════

/// An exactly recurring pattern is reinforced instead of reinstalled,
/// so its score climbs while the table occupancy stays put.
#[test]
fn exact_recurrence_reinforces_score() {
    let mut pf = PatternTablePredictor::new(&slow_aging_config(), 2);
    let stride = 64_u64;

    for i in 0..32_u64 {
        pf.observe(&miss(0x1_0000 + i * stride));
    }

    let scores = pf.scores();
    let top = *scores.iter().max().unwrap();
    assert!(
        top > 10,
        "The all-stride pattern should accumulate score, got {top}"
    );
    let reinforced = scores.iter().filter(|&&s| s == top).count();
    assert_eq!(reinforced, 1, "One dominant pattern, not many copies");
}

/// Installation replaces the lowest-scoring entry, leaving reinforced
/// patterns untouched.
#[test]
fn install_evicts_lowest_score() {
    let mut pf = PatternTablePredictor::new(&slow_aging_config(), 2);
    let stride = 64_u64;

    // Build one strong pattern.
    for i in 0..32_u64 {
        pf.observe(&miss(0x1_0000 + i * stride));
    }
    let strong = *pf.scores().iter().max().unwrap();

    // Flood with irregular accesses; each installs over a weak entry.
    let mut addr = 0x9_0000_u64;
    for i in 1..16_u64 {
        addr += i * 136;
        pf.observe(&miss(addr));
    }

    assert_eq!(
        *pf.scores().iter().max().unwrap(),
        strong,
        "The strong pattern must survive the flood"
    );
}

// ══════════════════════════════════════════════════════════
// 3. Aging
// ══════════════════════════════════════════════════════════

/// Every aging period, all scores decay by one.
#[test]
fn scores_decay_each_period() {
    let config = PatternConfig {
        table_size: 4,
        aging_factor: 1,
        ..PatternConfig::default()
    };
    // Period = aging_factor * table_size = 4 accesses.
    let mut pf = PatternTablePredictor::new(&config, 2);

    let mut addr = 0x1_0000_u64;
    for i in 1..=4_u64 {
        addr += i * 200;
        pf.observe(&miss(addr));
    }

    // Four installs at score 1, then one decay: nothing above zero.
    let scores = pf.scores();
    assert_eq!(scores.len(), 4);
    assert!(scores.iter().all(|&s| s <= 0), "Decay missed: {scores:?}");
}

/// Aged-out patterns lose replacement ties to fresher installs; the
/// table keeps functioning and re-learns a returning pattern.
#[test]
fn table_relearns_after_decay() {
    let config = PatternConfig {
        table_size: 4,
        aging_factor: 2,
        ..PatternConfig::default()
    };
    let mut pf = PatternTablePredictor::new(&config, 2);
    let stride = 64_u64;

    // Learn, wander, then return to the stride.
    for i in 0..16_u64 {
        pf.observe(&miss(0x1_0000 + i * stride));
    }
    let mut addr = 0x9_0000_u64;
    for i in 1..40_u64 {
        addr += i * 104;
        pf.observe(&miss(addr));
    }

    let base = 0x20_0000_u64;
    let mut out = Vec::new();
    for i in 0..10_u64 {
        out = pf.observe(&miss(base + i * stride));
    }
    let last = base + 9 * stride;
    assert_eq!(out, vec![last + stride, last + 2 * stride]);
}
