//! Probe Controller Tests.
//!
//! Verifies the three-point exploration cycle: probe ordering, choice
//! by strict improvement, countdown hysteresis, and behavior at the
//! edges of the degree range.

use prefetch_core::config::ProbeConfig;
use prefetch_core::controller::{DegreeController, ProbeController};
use prefetch_core::stats::AccessStats;
use proptest::prelude::*;

fn stats(reads: i64, hits: i64) -> AccessStats {
    let mut s = AccessStats::new();
    s.reads = reads;
    s.read_hits = hits;
    s
}

fn controller(degree: usize, max: usize) -> ProbeController {
    ProbeController::new(degree, max, &ProbeConfig::default())
}

// ══════════════════════════════════════════════════════════
// 1. Probe ordering
// ══════════════════════════════════════════════════════════

/// The first calibration only seeds; the probing round then visits
/// current, lower, higher, and settles.
#[test]
fn probe_round_visits_neighbors() {
    let mut ctl = controller(1, 4);
    let flat = stats(1000, 500);

    ctl.calibrate(&flat);
    assert_eq!(ctl.degree(), 1, "Seeding interval holds the degree");

    ctl.calibrate(&flat);
    assert_eq!(ctl.degree(), 0, "Lower probe runs first");
    ctl.calibrate(&flat);
    assert_eq!(ctl.degree(), 2, "Higher probe runs second");
    ctl.calibrate(&flat);
    assert_eq!(ctl.degree(), 1, "Back to current before choosing");
    ctl.calibrate(&flat);
    assert_eq!(ctl.degree(), 1, "Flat scores keep the current degree");
}

/// A strictly better higher probe moves the choice up.
#[test]
fn higher_probe_wins_on_strict_improvement() {
    let mut ctl = controller(1, 4);
    ctl.calibrate(&stats(1000, 500)); // seed
    ctl.calibrate(&stats(1000, 500)); // record current (degree 1)
    ctl.calibrate(&stats(1000, 400)); // record lower (degree 0)
    ctl.calibrate(&stats(1000, 800)); // record higher (degree 2)
    ctl.calibrate(&stats(1000, 500)); // choose
    assert_eq!(ctl.degree(), 2);
}

/// A strictly better lower probe moves the choice down.
#[test]
fn lower_probe_wins_on_strict_improvement() {
    let mut ctl = controller(1, 4);
    ctl.calibrate(&stats(1000, 500)); // seed
    ctl.calibrate(&stats(1000, 500)); // record current
    ctl.calibrate(&stats(1000, 800)); // record lower
    ctl.calibrate(&stats(1000, 400)); // record higher
    ctl.calibrate(&stats(1000, 500)); // choose
    assert_eq!(ctl.degree(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Countdown hysteresis
// ══════════════════════════════════════════════════════════

/// A changed choice holds for the short countdown; repeating the same
/// choice holds for the long one.
#[test]
fn repeated_choice_holds_longer() {
    let mut ctl = controller(1, 4);
    let flat = stats(1000, 500);

    // Seed + first full probing round (4 intervals) settles on 1 with
    // the short countdown of 2.
    for _ in 0..5 {
        ctl.calibrate(&flat);
    }
    assert_eq!(ctl.degree(), 1);

    // Countdown of 2 ticks, then a second round (4 intervals) settles
    // on 1 again.
    for _ in 0..6 {
        ctl.calibrate(&flat);
    }
    assert_eq!(ctl.degree(), 1);

    // Same choice twice: the long countdown (16) now pins the degree.
    for _ in 0..16 {
        ctl.calibrate(&flat);
        assert_eq!(ctl.degree(), 1, "Long countdown must hold the choice");
    }
    // The next round begins by probing the lower neighbor.
    ctl.calibrate(&flat);
    assert_eq!(ctl.degree(), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Edges
// ══════════════════════════════════════════════════════════

/// At degree 0 there is no lower neighbor; the round probes only
/// upward and an unprobed side can never win.
#[test]
fn no_lower_probe_at_zero() {
    let mut ctl = controller(0, 4);
    let flat = stats(1000, 500);
    ctl.calibrate(&flat); // seed
    ctl.calibrate(&flat); // record current (degree 0)
    assert_eq!(ctl.degree(), 1, "Straight to the higher probe");
    ctl.calibrate(&flat); // record higher
    assert_eq!(ctl.degree(), 0);
    ctl.calibrate(&flat); // choose: flat scores, stay at 0
    assert_eq!(ctl.degree(), 0);
}

/// At the top of the range there is no higher neighbor to probe.
#[test]
fn no_higher_probe_at_max() {
    let mut ctl = controller(4, 4);
    let flat = stats(1000, 500);
    ctl.calibrate(&flat); // seed
    ctl.calibrate(&flat); // record current (degree 4)
    assert_eq!(ctl.degree(), 3, "Lower probe first");
    ctl.calibrate(&flat); // record lower; no room above
    assert_eq!(ctl.degree(), 4);
    ctl.calibrate(&flat); // choose: flat scores, stay at 4
    assert_eq!(ctl.degree(), 4);
}

// ══════════════════════════════════════════════════════════
// 4. Bounds
// ══════════════════════════════════════════════════════════

proptest! {
    /// The degree never leaves `[0, max_degree]`, whatever the
    /// statistics sequence.
    #[test]
    fn degree_stays_in_bounds(
        initial in 0_usize..=4,
        max in 0_usize..=4,
        intervals in proptest::collection::vec((1_i64..10_000, 0_i64..10_000), 1..120),
    ) {
        let mut ctl = controller(initial.min(max), max);
        for &(reads, hits) in &intervals {
            ctl.calibrate(&stats(reads, hits.min(reads)));
            prop_assert!(ctl.degree() <= max);
        }
    }
}
