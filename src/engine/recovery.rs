use crate::notation::token::MoveToken;

/// Inputs a recovery rule may inspect. `bad` already contains the move
/// that just failed to match (it is pushed before rules run); `recent` is
/// the rolling window of live moves, matched or not, newest last.
pub struct RuleInput<'a> {
    pub current: i32,
    pub bad: &'a [MoveToken],
    pub expected_first: Option<MoveToken>,
    pub recent: &'a [MoveToken],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleEffect {
    /// Undid a correct opening move: back to the not-started state.
    ResetToStart,
    /// The last move cancelled the previous bad move; drop both.
    PopLastTwo,
    /// Four identical quarter turns: a misdetected double/wide turn.
    PopLastFour,
}

pub struct RecoveryRule {
    pub name: &'static str,
    pub applies: fn(&RuleInput) -> bool,
    pub effect: RuleEffect,
}

/// Evaluated in order after every unmatched move; the first applicable
/// rule wins and the rest are skipped.
pub const RECOVERY_RULES: &[RecoveryRule] = &[
    RecoveryRule {
        name: "cancel-first-move",
        applies: cancel_first_move,
        effect: RuleEffect::ResetToStart,
    },
    RecoveryRule {
        name: "self-cancellation",
        applies: self_cancellation,
        effect: RuleEffect::PopLastTwo,
    },
    RecoveryRule {
        name: "quad-repeat",
        applies: quad_repeat,
        effect: RuleEffect::PopLastFour,
    },
];

fn cancel_first_move(input: &RuleInput) -> bool {
    input.current == 0
        && input.bad.len() == 1
        && input
            .expected_first
            .is_some_and(|first| input.bad[0] == first.inverse())
}

fn self_cancellation(input: &RuleInput) -> bool {
    input.bad.len() >= 2 && input.bad[input.bad.len() - 1] == input.bad[input.bad.len() - 2].inverse()
}

fn quad_repeat(input: &RuleInput) -> bool {
    if input.bad.len() < 4 || input.recent.len() < 4 {
        return false;
    }
    let tail = &input.recent[input.recent.len() - 4..];
    tail.iter().all(|&m| m == tail[0])
}
