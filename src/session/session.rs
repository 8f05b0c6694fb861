use rand::Rng;
use rand::rngs::SmallRng;

use crate::cube::CubePattern;
use crate::engine::tracker::{DisplaySnapshot, MistakeTracker, MoveColor, TrackOutcome};
use crate::notation::token::{Axis, Face, Layer, Modifier, MoveToken};
use crate::session::algorithm::Algorithm;
use crate::session::timer::{SolveTimer, TimerState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    InProgress,
    /// First confirmed (post-suppression) mistake of this attempt.
    Mistake,
    Completed {
        elapsed_ms: u64,
    },
}

/// One algorithm being drilled: the tracker, the timer, and the
/// once-per-attempt failure latch. Owns all matching state; the UI only
/// reads snapshots.
pub struct TrainingSession {
    algorithm: Algorithm,
    drilled: Vec<MoveToken>,
    tracker: MistakeTracker,
    timer: SolveTimer,
    random_auf: bool,
    failed: bool,
}

impl TrainingSession {
    pub fn new(
        algorithm: Algorithm,
        initial: CubePattern,
        random_auf: bool,
        rng: &mut SmallRng,
    ) -> Self {
        let drilled = if random_auf {
            with_random_auf(&algorithm.moves, rng)
        } else {
            algorithm.moves.clone()
        };
        let tracker = MistakeTracker::new(initial, drilled.clone());
        let mut timer = SolveTimer::new();
        timer.arm();
        Self {
            algorithm,
            drilled,
            tracker,
            timer,
            random_auf,
            failed: false,
        }
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// The move sequence actually matched, including any injected AUF.
    pub fn drilled_moves(&self) -> &[MoveToken] {
        &self.drilled
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn timer(&self) -> &SolveTimer {
        &self.timer
    }

    /// State to seed the next drill with, once complete.
    pub fn final_state(&self) -> Option<CubePattern> {
        self.tracker.final_state().cloned()
    }

    pub fn handle_move(&mut self, token: MoveToken, cube_timestamp_ms: Option<f64>) -> SessionOutcome {
        self.timer.note_move(cube_timestamp_ms);
        match self.tracker.feed(token) {
            TrackOutcome::Matched { complete: true, .. } => {
                let elapsed_ms = self.timer.stop();
                SessionOutcome::Completed { elapsed_ms }
            }
            TrackOutcome::Matched { .. } => SessionOutcome::InProgress,
            TrackOutcome::Deviation { .. } => {
                // Failure counts once per attempt, and only when the
                // deviation survives every suppression rule.
                let confirmed = self
                    .snapshot()
                    .colors
                    .iter()
                    .any(|c| *c == MoveColor::Error);
                if confirmed && !self.failed {
                    self.failed = true;
                    SessionOutcome::Mistake
                } else {
                    SessionOutcome::InProgress
                }
            }
        }
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.tracker.classify(self.random_auf)
    }

    /// Manual timing for the keyboard fallback; no move matching.
    pub fn start_timer(&mut self) {
        self.timer.note_move(None);
    }

    pub fn stop_timer(&mut self) -> u64 {
        self.timer.stop()
    }

    /// Restart the attempt from a fresh physical state (same algorithm,
    /// same AUF).
    pub fn restart(&mut self, initial: CubePattern) {
        self.tracker.reset(initial);
        self.timer.arm();
        self.failed = false;
    }

    pub fn is_running(&self) -> bool {
        self.timer.state() == TimerState::Running
    }
}

/// Prepend a random top-layer turn when it actually changes the drill:
/// an algorithm that itself starts on the U axis would fold the AUF into
/// its own first move, so those are left alone.
pub fn with_random_auf(moves: &[MoveToken], rng: &mut SmallRng) -> Vec<MoveToken> {
    let valid = moves.first().is_some_and(|m| m.axis() != Axis::Y);
    if !valid {
        return moves.to_vec();
    }
    let modifier = match rng.gen_range(0..3) {
        0 => Modifier::Plain,
        1 => Modifier::Prime,
        _ => Modifier::Double,
    };
    let mut out = Vec::with_capacity(moves.len() + 1);
    out.push(MoveToken::new(Layer::Outer(Face::U), modifier));
    out.extend_from_slice(moves);
    out
}
