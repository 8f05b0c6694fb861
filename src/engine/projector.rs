use crate::cube::{CubePattern, apply_move};
use crate::notation::token::{Layer, Modifier, MoveToken, RotationAxis};

/// Per-move intermediate states for one algorithm.
///
/// `raw[i]` is the state immediately after `moves[0..=i]` and seeds the
/// next drill when the queue rotates; `fixed[i]` is the same state
/// canonicalized against whole-cube orientation and is what live moves
/// are matched against.
#[derive(Clone, Debug)]
pub struct Checkpoints {
    pub fixed: Vec<CubePattern>,
    pub raw: Vec<CubePattern>,
}

impl Checkpoints {
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    pub fn final_raw(&self) -> Option<&CubePattern> {
        self.raw.last()
    }
}

pub fn project(initial: &CubePattern, moves: &[MoveToken]) -> Checkpoints {
    let mut fixed = Vec::with_capacity(moves.len());
    let mut raw = Vec::with_capacity(moves.len());
    let mut state = initial.clone();
    for &m in moves {
        state = apply_move(&state, m);
        raw.push(state.clone());
        fixed.push(fix_orientation(&state));
    }
    Checkpoints { fixed, raw }
}

const ROTATION_TRIALS: [RotationAxis; 3] = [RotationAxis::X, RotationAxis::Y, RotationAxis::Z];

/// Undo any whole-cube rotation baked into a state by trial: for each
/// axis, apply the rotation up to four times and return the first state
/// whose centers read as the identity. A state that never lines up is
/// returned unchanged; that fallback is defensive and not expected for a
/// correctly-shaped cube.
pub fn fix_orientation(pattern: &CubePattern) -> CubePattern {
    if pattern.centers_solved() {
        return pattern.clone();
    }
    for axis in ROTATION_TRIALS {
        let rotation = MoveToken::new(Layer::Rotation(axis), Modifier::Plain);
        let mut state = pattern.clone();
        for _ in 0..4 {
            state = apply_move(&state, rotation);
            if state.centers_solved() {
                return state;
            }
        }
    }
    pattern.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::apply_alg;
    use crate::notation::parse_alg;

    #[test]
    fn yields_one_checkpoint_per_move() {
        let alg = parse_alg("R U R' U'").unwrap();
        let checkpoints = project(&CubePattern::solved(), &alg);
        assert_eq!(checkpoints.len(), 4);
        assert_eq!(checkpoints.raw.len(), 4);
    }

    #[test]
    fn raw_checkpoint_i_is_the_prefix_state() {
        let alg = parse_alg("R U2 F' L D").unwrap();
        let checkpoints = project(&CubePattern::solved(), &alg);
        for i in 0..alg.len() {
            let prefix = apply_alg(&CubePattern::solved(), &alg[..=i]);
            assert_eq!(checkpoints.raw[i], prefix, "prefix {i}");
        }
    }

    #[test]
    fn face_move_checkpoints_need_no_fixing() {
        let alg = parse_alg("R U R'").unwrap();
        let checkpoints = project(&CubePattern::solved(), &alg);
        assert_eq!(checkpoints.fixed, checkpoints.raw);
    }

    #[test]
    fn wide_turn_checkpoint_fixes_to_the_equivalent_face_turn() {
        // r = x L, so after undoing the rotation only an L remains.
        let alg = parse_alg("r").unwrap();
        let checkpoints = project(&CubePattern::solved(), &alg);
        assert!(!checkpoints.raw[0].centers_solved());
        let expected = apply_alg(&CubePattern::solved(), &parse_alg("L").unwrap());
        assert_eq!(checkpoints.fixed[0], expected);
    }

    #[test]
    fn rotation_only_move_fixes_back_to_start() {
        let alg = parse_alg("y").unwrap();
        let checkpoints = project(&CubePattern::solved(), &alg);
        assert_eq!(checkpoints.fixed[0], CubePattern::solved());
    }

    #[test]
    fn already_canonical_state_is_returned_unchanged() {
        let state = apply_alg(&CubePattern::solved(), &parse_alg("R U").unwrap());
        assert_eq!(fix_orientation(&state), state);
    }

    #[test]
    fn projection_starts_from_the_given_initial_state() {
        let initial = apply_alg(&CubePattern::solved(), &parse_alg("F2").unwrap());
        let alg = parse_alg("F2").unwrap();
        let checkpoints = project(&initial, &alg);
        assert!(checkpoints.raw[0].is_solved());
    }
}
