use std::time::Duration;

/// Displayed percentage when the simulator starts.
pub const START_PCT: f32 = 6.0;
/// Ceiling the simulator holds at while the fetch is still in flight.
pub const HOLD_PCT: f32 = 92.0;
/// Fixed step increments applied one per timer tick.
pub const STEP_INCREMENTS: [f32; 8] = [8.0, 12.0, 9.0, 10.0, 7.0, 6.0, 5.0, 12.0];

const STEP_DELAY_FLOOR_MS: u64 = 450;
const STEP_DELAY_SPAN_MS: u64 = 300;
const HOLD_POLL_MS: u64 = 300;
const FINALIZE_TICK_MS: u64 = 120;
const FINALIZE_SNAP_PCT: f32 = 99.5;
const FINALIZE_RATE: f32 = 0.25;

/// Monotonic percentage gauge. Writes that would move the needle backwards
/// or past 100 are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressGauge {
    pct: f32,
}

impl ProgressGauge {
    pub fn pct(&self) -> f32 {
        self.pct
    }

    /// Rounded percentage for display.
    pub fn rounded(&self) -> u8 {
        self.pct.round().min(100.0) as u8
    }

    fn set(&mut self, pct: f32) {
        self.pct = pct.clamp(self.pct, 100.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimPhase {
    /// Walking through `STEP_INCREMENTS`.
    Stepping,
    /// Increments exhausted; holding at the ceiling until the fetch settles.
    Holding,
    /// Fetch settled successfully; converging on 100.
    Finalizing,
    /// Fetch failed; no further movement.
    Halted,
    /// Snapped to 100.
    Complete,
}

/// Cosmetic progress simulator, one instance per boot.
///
/// The schedule is a pure function of the seed: a fixed seed reproduces the
/// exact sequence of step delays.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSim {
    gauge: ProgressGauge,
    seed: u64,
    step: usize,
    phase: SimPhase,
}

impl ProgressSim {
    pub fn new(seed: u64) -> Self {
        let mut gauge = ProgressGauge::default();
        gauge.set(START_PCT);
        Self {
            gauge,
            seed,
            step: 0,
            phase: SimPhase::Stepping,
        }
    }

    pub fn pct(&self) -> f32 {
        self.gauge.pct()
    }

    pub fn rounded(&self) -> u8 {
        self.gauge.rounded()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SimPhase::Complete
    }

    /// Delay until the next tick should fire, or `None` once the simulator
    /// has nothing left to do.
    pub fn next_delay(&self) -> Option<Duration> {
        match self.phase {
            SimPhase::Stepping => Some(step_delay(self.seed, self.step)),
            SimPhase::Holding => Some(Duration::from_millis(HOLD_POLL_MS)),
            SimPhase::Finalizing => Some(Duration::from_millis(FINALIZE_TICK_MS)),
            SimPhase::Halted | SimPhase::Complete => None,
        }
    }

    /// Applies one timer tick. Ticks arriving after a halt are no-ops, so a
    /// stale sleeper thread cannot move the gauge.
    pub fn advance(&mut self) {
        match self.phase {
            SimPhase::Stepping => {
                let increment = STEP_INCREMENTS[self.step];
                self.gauge.set((self.pct() + increment).min(HOLD_PCT));
                self.step += 1;
                if self.step >= STEP_INCREMENTS.len() {
                    self.phase = SimPhase::Holding;
                }
            }
            SimPhase::Holding => {
                self.gauge.set(HOLD_PCT);
            }
            SimPhase::Finalizing => {
                let p = self.pct();
                let next = p + ((100.0 - p) * FINALIZE_RATE).max(1.0);
                if next >= FINALIZE_SNAP_PCT {
                    self.gauge.set(100.0);
                    self.phase = SimPhase::Complete;
                } else {
                    self.gauge.set(next);
                }
            }
            SimPhase::Halted | SimPhase::Complete => {}
        }
    }

    /// Switches to the finalize phase after a successful settle.
    pub fn begin_finalize(&mut self) {
        if matches!(
            self.phase,
            SimPhase::Stepping | SimPhase::Holding | SimPhase::Finalizing
        ) {
            self.phase = SimPhase::Finalizing;
        }
    }

    /// Stops the simulator where it is; used on fetch failure.
    pub fn halt(&mut self) {
        if self.phase != SimPhase::Complete {
            self.phase = SimPhase::Halted;
        }
    }
}

/// Deterministic per-step jitter in `450..750` ms, derived from the seed with
/// a splitmix64 round.
fn step_delay(seed: u64, step: usize) -> Duration {
    let jitter = splitmix64(seed.wrapping_add(step as u64)) % STEP_DELAY_SPAN_MS;
    Duration::from_millis(STEP_DELAY_FLOOR_MS + jitter)
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_never_moves_backwards() {
        let mut gauge = ProgressGauge::default();
        gauge.set(40.0);
        gauge.set(12.0);
        assert_eq!(gauge.pct(), 40.0);
        gauge.set(140.0);
        assert_eq!(gauge.pct(), 100.0);
    }

    #[test]
    fn step_delay_is_deterministic_and_bounded() {
        for step in 0..STEP_INCREMENTS.len() {
            let a = step_delay(42, step);
            let b = step_delay(42, step);
            assert_eq!(a, b);
            assert!(a >= Duration::from_millis(450));
            assert!(a < Duration::from_millis(750));
        }
    }
}
