use crate::cube::{CubePattern, apply_move, simplify};
use crate::engine::projector::{Checkpoints, fix_orientation, project};
use crate::engine::recovery::{RECOVERY_RULES, RuleEffect, RuleInput};
use crate::notation::token::{Face, Layer, MoveToken, invert_alg};

/// How many live moves to remember for the repetition heuristic.
const RECENT_WINDOW: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The live state landed on a checkpoint.
    Matched { index: usize, complete: bool },
    /// The move missed every checkpoint; `recovered` names the recovery
    /// rule that fired, if any.
    Deviation { recovered: Option<RuleEffect> },
}

/// Per-move classification handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveColor {
    Correct,
    Pending,
    Error,
    Neutral,
}

/// Read-only view of the tracker emitted after every event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub colors: Vec<MoveColor>,
    pub fix_hint: Option<String>,
    pub current: i32,
}

/// The drill state machine. Consumes one live move at a time, with no
/// lookahead and no undo, and decides whether the solver is still on
/// track for the target algorithm.
pub struct MistakeTracker {
    moves: Vec<MoveToken>,
    checkpoints: Checkpoints,
    live: CubePattern,
    current: i32,
    bad: Vec<MoveToken>,
    recent: Vec<MoveToken>,
}

impl MistakeTracker {
    pub fn new(initial: CubePattern, moves: Vec<MoveToken>) -> Self {
        let checkpoints = project(&initial, &moves);
        Self {
            moves,
            checkpoints,
            live: initial,
            current: -1,
            bad: Vec::new(),
            recent: Vec::new(),
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn bad_moves(&self) -> &[MoveToken] {
        &self.bad
    }

    pub fn is_complete(&self) -> bool {
        !self.moves.is_empty() && self.current == self.moves.len() as i32 - 1
    }

    /// Raw (unfixed) state after the whole algorithm; seeds the next
    /// drill so physical orientation carries over between attempts.
    pub fn final_state(&self) -> Option<&CubePattern> {
        self.checkpoints.final_raw()
    }

    pub fn reset(&mut self, initial: CubePattern) {
        self.checkpoints = project(&initial, &self.moves);
        self.live = initial;
        self.current = -1;
        self.bad.clear();
        self.recent.clear();
    }

    /// Advance the machine by one live move. Checkpoint matching always
    /// wins over recovery: a move that both cancels a mistake and lands
    /// on a checkpoint is treated as a match.
    pub fn feed(&mut self, m: MoveToken) -> TrackOutcome {
        self.live = apply_move(&self.live, m);
        self.recent.push(m);
        if self.recent.len() > RECENT_WINDOW {
            self.recent.remove(0);
        }

        let live_fixed = fix_orientation(&self.live);
        for i in 0..self.checkpoints.len() {
            if live_fixed == self.checkpoints.fixed[i] {
                return self.accept(i);
            }
        }
        // Intermediate checkpoints are orientation-fixed, so a solve that
        // ends in a rotated frame can slip past them; the raw final state
        // still certifies completion.
        if self
            .checkpoints
            .final_raw()
            .is_some_and(|last| self.live == *last)
        {
            return self.accept(self.checkpoints.len() - 1);
        }

        self.bad.push(m);
        let input = RuleInput {
            current: self.current,
            bad: &self.bad,
            expected_first: self.moves.first().copied(),
            recent: &self.recent,
        };
        let fired = RECOVERY_RULES
            .iter()
            .find(|rule| (rule.applies)(&input))
            .map(|rule| rule.effect);
        match fired {
            Some(RuleEffect::ResetToStart) => {
                self.current = -1;
                self.bad.clear();
            }
            Some(RuleEffect::PopLastTwo) => {
                let len = self.bad.len();
                self.bad.truncate(len - 2);
            }
            Some(RuleEffect::PopLastFour) => {
                let len = self.bad.len();
                self.bad.truncate(len - 4);
            }
            None => {}
        }
        TrackOutcome::Deviation { recovered: fired }
    }

    fn accept(&mut self, index: usize) -> TrackOutcome {
        self.current = index as i32;
        self.bad.clear();
        TrackOutcome::Matched {
            index,
            complete: index == self.checkpoints.len() - 1,
        }
    }

    fn expected(&self, offset: i32) -> Option<MoveToken> {
        let idx = self.current + offset;
        if idx < 0 {
            return None;
        }
        self.moves.get(idx as usize).copied()
    }

    /// Classify every algorithm move for rendering. Pure with respect to
    /// tracker state; suppression decisions here never touch the buffer
    /// or the match index.
    pub fn classify(&self, random_auf: bool) -> DisplaySnapshot {
        let mut colors = vec![MoveColor::Neutral; self.moves.len()];
        for color in colors.iter_mut().take((self.current + 1).max(0) as usize) {
            *color = MoveColor::Correct;
        }

        if self.bad.is_empty() {
            return DisplaySnapshot {
                colors,
                fix_hint: None,
                current: self.current,
            };
        }

        let simplified = simplify(&self.bad);
        let next_idx = (self.current + 1) as usize;
        let suppressed = self.partial_turn_in_progress(&simplified)
            || self.ambiguous_auf(random_auf, &simplified)
            || self.opposite_face_commutation(&simplified);

        if suppressed {
            if let Some(color) = colors.get_mut(next_idx) {
                *color = MoveColor::Pending;
            }
            return DisplaySnapshot {
                colors,
                fix_hint: None,
                current: self.current,
            };
        }

        if let Some(color) = colors.get_mut(next_idx) {
            *color = MoveColor::Error;
        }
        let fix = invert_alg(&simplified);
        let fix_hint = if fix.is_empty() {
            None
        } else {
            Some(
                fix.iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        };
        DisplaySnapshot {
            colors,
            fix_hint,
            current: self.current,
        }
    }

    /// A slice, wide, or double turn can arrive from the hardware as
    /// several quarter turns; while the reduced buffer is still a
    /// plausible prefix of the expected compound turn, hold judgement.
    fn partial_turn_in_progress(&self, simplified: &[MoveToken]) -> bool {
        let Some(expected) = self.expected(1) else {
            return false;
        };
        let compound = expected.is_half_turn()
            || matches!(expected.layer, Layer::Wide(_) | Layer::Slice(_));
        if !compound {
            return false;
        }
        let limit = match expected.layer {
            Layer::Slice(_) => 2,
            _ => 1,
        };
        !simplified.is_empty()
            && simplified.len() <= limit
            && simplified.iter().all(|t| t.axis() == expected.axis())
    }

    /// With a randomized pre-rotation the correct top-layer orientation
    /// is ambiguous by design; a lone U-layer turn before the first
    /// match is not yet a mistake.
    fn ambiguous_auf(&self, random_auf: bool, simplified: &[MoveToken]) -> bool {
        random_auf
            && self.current == -1
            && simplified.len() == 1
            && simplified[0].layer == Layer::Outer(Face::U)
    }

    /// Opposite faces commute, so an expected `U D` executed as `D U` is
    /// fine: the out-of-order move waits as pending until its partner
    /// lands on the checkpoint.
    fn opposite_face_commutation(&self, simplified: &[MoveToken]) -> bool {
        if simplified.len() != 1 {
            return false;
        }
        let b = simplified[0];
        let (Some(want_now), Some(want_next)) = (self.expected(1), self.expected(2)) else {
            return false;
        };
        b.opposite()
            .is_some_and(|opp| b == want_next && opp == want_now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_alg;

    fn tracker(alg: &str) -> MistakeTracker {
        MistakeTracker::new(CubePattern::solved(), parse_alg(alg).unwrap())
    }

    fn feed_all(t: &mut MistakeTracker, alg: &str) -> Vec<TrackOutcome> {
        parse_alg(alg).unwrap().into_iter().map(|m| t.feed(m)).collect()
    }

    #[test]
    fn exact_execution_matches_every_checkpoint() {
        let mut t = tracker("R U R' U'");
        let outcomes = feed_all(&mut t, "R U R' U'");
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(
                *outcome,
                TrackOutcome::Matched {
                    index: i,
                    complete: i == 3
                }
            );
        }
        assert!(t.is_complete());
        assert!(t.bad_moves().is_empty());
    }

    #[test]
    fn checkpoint_match_takes_precedence_over_cancellation() {
        // R U' leaves buffer [U']; the following U both cancels it and
        // returns the cube to checkpoint 0, and must count as a match
        // rather than a buffer recovery.
        let mut t = tracker("R U");
        t.feed(parse_alg("R").unwrap()[0]);
        let dev = t.feed(parse_alg("U'").unwrap()[0]);
        assert!(matches!(dev, TrackOutcome::Deviation { recovered: None }));
        assert_eq!(t.bad_moves().len(), 1);
        let back = t.feed(parse_alg("U").unwrap()[0]);
        assert_eq!(
            back,
            TrackOutcome::Matched {
                index: 0,
                complete: false
            }
        );
        assert!(t.bad_moves().is_empty());
        let fin = t.feed(parse_alg("U").unwrap()[0]);
        assert_eq!(
            fin,
            TrackOutcome::Matched {
                index: 1,
                complete: true
            }
        );
    }

    #[test]
    fn undoing_the_opening_move_returns_to_not_started() {
        let mut t = tracker("R U R'");
        t.feed(parse_alg("R").unwrap()[0]);
        assert_eq!(t.current(), 0);
        let out = t.feed(parse_alg("R'").unwrap()[0]);
        assert_eq!(
            out,
            TrackOutcome::Deviation {
                recovered: Some(RuleEffect::ResetToStart)
            }
        );
        assert_eq!(t.current(), -1);
        assert!(t.bad_moves().is_empty());
        // The drill is still completable from here.
        let outcomes = feed_all(&mut t, "R U R'");
        assert!(matches!(
            outcomes.last(),
            Some(TrackOutcome::Matched { complete: true, .. })
        ));
    }

    #[test]
    fn self_cancelled_mistakes_shrink_the_buffer() {
        // An earlier stray D keeps the cube off every checkpoint, so the
        // F F' pair is removed by the rule rather than by a match.
        let mut t = tracker("R U R'");
        t.feed(parse_alg("R").unwrap()[0]);
        feed_all(&mut t, "D F");
        assert_eq!(t.bad_moves().len(), 2);
        let out = t.feed(parse_alg("F'").unwrap()[0]);
        assert_eq!(
            out,
            TrackOutcome::Deviation {
                recovered: Some(RuleEffect::PopLastTwo)
            }
        );
        assert_eq!(t.bad_moves().len(), 1);
        assert_eq!(t.current(), 0);
    }

    #[test]
    fn four_repeated_quarter_turns_are_dropped_as_one_logical_turn() {
        let mut t = tracker("F U F'");
        t.feed(parse_alg("F").unwrap()[0]);
        t.feed(parse_alg("D").unwrap()[0]);
        let outcomes = feed_all(&mut t, "R R R R");
        assert_eq!(
            *outcomes.last().unwrap(),
            TrackOutcome::Deviation {
                recovered: Some(RuleEffect::PopLastFour)
            }
        );
        assert_eq!(t.bad_moves().len(), 1);
    }

    #[test]
    fn unrecovered_deviation_colors_the_next_move_as_error_with_a_hint() {
        let mut t = tracker("R U R'");
        t.feed(parse_alg("R").unwrap()[0]);
        t.feed(parse_alg("F").unwrap()[0]);
        t.feed(parse_alg("D").unwrap()[0]);
        let snap = t.classify(false);
        assert_eq!(snap.colors[0], MoveColor::Correct);
        assert_eq!(snap.colors[1], MoveColor::Error);
        assert_eq!(snap.colors[2], MoveColor::Neutral);
        assert_eq!(snap.fix_hint.as_deref(), Some("D' F'"));
    }

    #[test]
    fn clean_progress_shows_no_hint() {
        let mut t = tracker("R U R'");
        t.feed(parse_alg("R").unwrap()[0]);
        let snap = t.classify(false);
        assert_eq!(snap.colors, vec![
            MoveColor::Correct,
            MoveColor::Neutral,
            MoveColor::Neutral
        ]);
        assert_eq!(snap.fix_hint, None);
    }

    #[test]
    fn half_turn_in_progress_is_pending_not_error() {
        let mut t = tracker("U2 F");
        t.feed(parse_alg("U").unwrap()[0]);
        let snap = t.classify(false);
        assert_eq!(snap.colors[0], MoveColor::Pending);
        assert_eq!(snap.fix_hint, None);
        // Completing the half turn matches checkpoint 0.
        let out = t.feed(parse_alg("U").unwrap()[0]);
        assert_eq!(
            out,
            TrackOutcome::Matched {
                index: 0,
                complete: false
            }
        );
    }

    #[test]
    fn slice_turn_tolerates_two_partial_outer_turns() {
        let mut t = tracker("M U");
        t.feed(parse_alg("R").unwrap()[0]);
        t.feed(parse_alg("L'").unwrap()[0]);
        let snap = t.classify(false);
        assert_eq!(snap.colors[0], MoveColor::Pending);
        // x finishes the slice: R L' x' = M ... feeding x' lands on M.
        let out = t.feed(parse_alg("x'").unwrap()[0]);
        assert_eq!(
            out,
            TrackOutcome::Matched {
                index: 0,
                complete: false
            }
        );
    }

    #[test]
    fn cross_axis_deviation_is_not_suppressed_for_a_compound_move() {
        let mut t = tracker("U2 F");
        t.feed(parse_alg("R").unwrap()[0]);
        let snap = t.classify(false);
        assert_eq!(snap.colors[0], MoveColor::Error);
    }

    #[test]
    fn lone_top_layer_turn_is_ambiguous_only_with_random_auf() {
        let mut t = tracker("R U R'");
        t.feed(parse_alg("U").unwrap()[0]);
        assert_eq!(t.classify(true).colors[0], MoveColor::Pending);
        assert_eq!(t.classify(false).colors[0], MoveColor::Error);
    }

    #[test]
    fn opposite_face_pair_performed_in_reverse_order_is_pending_then_matched() {
        let mut t = tracker("U D F");
        let out = t.feed(parse_alg("D").unwrap()[0]);
        assert!(matches!(out, TrackOutcome::Deviation { recovered: None }));
        let snap = t.classify(false);
        assert_eq!(snap.colors[0], MoveColor::Pending);
        assert_eq!(snap.fix_hint, None);
        // U and D commute, so the second move lands on checkpoint 1.
        let out = t.feed(parse_alg("U").unwrap()[0]);
        assert_eq!(
            out,
            TrackOutcome::Matched {
                index: 1,
                complete: false
            }
        );
    }

    #[test]
    fn commutation_rule_needs_the_exact_opposite_pair() {
        // Expected R L, performed L: inverse/opposite do not line up the
        // way the commutation rule requires, so this stays an error.
        let mut t = tracker("R L F");
        t.feed(parse_alg("L").unwrap()[0]);
        // L == next expected (L) and opposite(L) == R == current expected,
        // so this specific pair does suppress.
        assert_eq!(t.classify(false).colors[0], MoveColor::Pending);

        let mut t = tracker("R F L");
        t.feed(parse_alg("L").unwrap()[0]);
        assert_eq!(t.classify(false).colors[0], MoveColor::Error);
    }

    #[test]
    fn reset_clears_progress_and_reseeds_checkpoints() {
        let mut t = tracker("R U");
        feed_all(&mut t, "R U");
        assert!(t.is_complete());
        let next_initial = t.final_state().cloned().unwrap();
        t.reset(next_initial);
        assert_eq!(t.current(), -1);
        assert!(t.bad_moves().is_empty());
        let outcomes = feed_all(&mut t, "R U");
        assert!(matches!(
            outcomes.last(),
            Some(TrackOutcome::Matched { complete: true, .. })
        ));
    }

    #[test]
    fn deviations_accumulate_until_matched() {
        let mut t = tracker("R U R' U'");
        feed_all(&mut t, "R U");
        feed_all(&mut t, "F D");
        assert_eq!(t.bad_moves().len(), 2);
        // Undo the detour, then finish.
        feed_all(&mut t, "D' F'");
        assert!(t.bad_moves().is_empty());
        let outcomes = feed_all(&mut t, "R' U'");
        assert!(matches!(
            outcomes.last(),
            Some(TrackOutcome::Matched { complete: true, .. })
        ));
    }
}
