//! Gift box opening sequence.
//!
//! Four steps, each held for a fixed time before the next. The first
//! trigger starts the sequence; later triggers are ignored. Reaching the
//! last step is the reveal, reported exactly once.

use std::time::{Duration, Instant};

pub const STEPS: u8 = 4;

/// How long each step is held before advancing, indexed by `step - 1`.
pub const STEP_DURATIONS: [Duration; STEPS as usize] = [
    Duration::from_millis(2000),
    Duration::from_millis(2000),
    Duration::from_millis(1000),
    Duration::from_millis(1000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Opening { step: u8, next_at: Instant },
    Revealed,
}

/// Reported when the sequence moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// Entered step 1, 2 or 3.
    Step(u8),
    /// Entered the final step: hide the box and start the show.
    Revealed,
}

#[derive(Debug, Clone)]
pub struct RevealSequencer {
    phase: Phase,
}

impl Default for RevealSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealSequencer {
    pub fn new() -> Self {
        Self { phase: Phase::Waiting }
    }

    /// Current step, `None` until triggered.
    pub fn step(&self) -> Option<u8> {
        match self.phase {
            Phase::Waiting => None,
            Phase::Opening { step, .. } => Some(step),
            Phase::Revealed => Some(STEPS),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.phase == Phase::Waiting
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == Phase::Revealed
    }

    /// Click or Enter/Space on the box. Only the first call does anything.
    pub fn trigger(&mut self, now: Instant) -> Option<RevealEvent> {
        if self.phase != Phase::Waiting {
            return None;
        }
        self.phase = Phase::Opening { step: 1, next_at: now + STEP_DURATIONS[0] };
        log::info!("gift box step 1");
        Some(RevealEvent::Step(1))
    }

    /// Advance past any step whose time is up. Returns at most one event per
    /// call; call until `None` to catch up after a stall.
    pub fn poll(&mut self, now: Instant) -> Option<RevealEvent> {
        let Phase::Opening { step, next_at } = self.phase else {
            return None;
        };
        if now < next_at {
            return None;
        }

        let step = step + 1;
        if step == STEPS {
            self.phase = Phase::Revealed;
            log::info!("gift box step {step}: revealed");
            return Some(RevealEvent::Revealed);
        }

        self.phase = Phase::Opening {
            step,
            next_at: next_at + STEP_DURATIONS[step as usize - 1],
        };
        log::info!("gift box step {step}");
        Some(RevealEvent::Step(step))
    }

    /// Jump straight to the reveal. `None` if already revealed.
    pub fn reveal_now(&mut self) -> Option<RevealEvent> {
        if self.phase == Phase::Revealed {
            return None;
        }
        self.phase = Phase::Revealed;
        log::info!("gift box skipped straight to reveal");
        Some(RevealEvent::Revealed)
    }
}
