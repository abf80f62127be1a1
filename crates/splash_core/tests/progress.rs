use std::time::Duration;

use splash_core::{ProgressSim, HOLD_PCT, START_PCT, STEP_INCREMENTS};

#[test]
fn schedule_is_reproducible_for_a_fixed_seed() {
    let mut a = ProgressSim::new(1234);
    let mut b = ProgressSim::new(1234);

    for _ in 0..STEP_INCREMENTS.len() {
        assert_eq!(a.next_delay(), b.next_delay());
        a.advance();
        b.advance();
        assert_eq!(a.pct(), b.pct());
    }
}

#[test]
fn step_delays_stay_inside_the_jitter_window() {
    let mut sim = ProgressSim::new(99);
    for _ in 0..STEP_INCREMENTS.len() {
        let delay = sim.next_delay().unwrap();
        assert!(delay >= Duration::from_millis(450), "{delay:?}");
        assert!(delay < Duration::from_millis(750), "{delay:?}");
        sim.advance();
    }
    // Exhausted increments: holding re-polls on a fixed cadence.
    assert_eq!(sim.next_delay(), Some(Duration::from_millis(300)));
}

#[test]
fn holding_never_exceeds_the_ceiling() {
    let mut sim = ProgressSim::new(0);
    for _ in 0..STEP_INCREMENTS.len() + 10 {
        sim.advance();
        assert!(sim.pct() <= HOLD_PCT);
    }
    assert_eq!(sim.pct(), HOLD_PCT);
    assert!(!sim.is_complete());
}

#[test]
fn finalize_converges_and_snaps_to_100() {
    let mut sim = ProgressSim::new(5);
    sim.advance();
    sim.advance();
    sim.begin_finalize();
    assert_eq!(sim.next_delay(), Some(Duration::from_millis(120)));

    let mut last = sim.pct();
    let mut steps = 0;
    while !sim.is_complete() {
        sim.advance();
        assert!(sim.pct() >= last);
        last = sim.pct();
        steps += 1;
        assert!(steps < 100, "finalize failed to converge");
    }
    assert_eq!(sim.pct(), 100.0);
    assert_eq!(sim.next_delay(), None);
}

#[test]
fn finalize_moves_at_least_one_point_per_tick() {
    let mut sim = ProgressSim::new(5);
    sim.begin_finalize();
    let mut prev = sim.pct();
    while !sim.is_complete() {
        sim.advance();
        if !sim.is_complete() {
            assert!(sim.pct() - prev >= 1.0 - f32::EPSILON);
        }
        prev = sim.pct();
    }
}

#[test]
fn halt_freezes_the_gauge() {
    let mut sim = ProgressSim::new(17);
    sim.advance();
    sim.halt();
    let frozen = sim.pct();

    sim.advance();
    sim.begin_finalize();
    sim.advance();

    assert_eq!(sim.pct(), frozen);
    assert_eq!(sim.next_delay(), None);
    assert!(frozen > START_PCT - f32::EPSILON);
    assert!(frozen < 100.0);
}
