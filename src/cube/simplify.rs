use crate::notation::token::{Layer, MoveToken};

/// Free reduction of a move sequence: adjacent turns of the same layer
/// merge mod 4, and a turn may merge past interposed moves as long as
/// every skipped move shares its rotation axis (same-axis layers act on
/// disjoint or nested slabs and commute). A net-identity sequence reduces
/// to nothing.
///
/// This is the engine's `simplifyWithCancellation`; the mistake tracker
/// leans on it for fix hints and for the suppression truth table, so it
/// must be deterministic for a given input.
pub fn simplify(tokens: &[MoveToken]) -> Vec<MoveToken> {
    let mut stack: Vec<(Layer, u8)> = Vec::new();

    'next: for &token in tokens {
        let mut idx = stack.len();
        while idx > 0 {
            let (layer, turns) = stack[idx - 1];
            if layer == token.layer {
                let merged = (turns + token.quarter_turns()) % 4;
                if merged == 0 {
                    stack.remove(idx - 1);
                } else {
                    stack[idx - 1].1 = merged;
                }
                continue 'next;
            }
            if layer.axis() != token.layer.axis() {
                break;
            }
            idx -= 1;
        }
        stack.push((token.layer, token.quarter_turns()));
    }

    stack
        .into_iter()
        .filter_map(|(layer, turns)| MoveToken::from_quarter_turns(layer, turns))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_alg;

    fn simp(alg: &str) -> String {
        simplify(&parse_alg(alg).unwrap())
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn adjacent_inverses_cancel() {
        assert_eq!(simp("R R'"), "");
        assert_eq!(simp("U2 U2"), "");
        assert_eq!(simp("R U U' R'"), "");
    }

    #[test]
    fn same_layer_merges() {
        assert_eq!(simp("R R"), "R2");
        assert_eq!(simp("R R2"), "R'");
        assert_eq!(simp("R2' R'"), "R");
        assert_eq!(simp("U U U U"), "");
    }

    #[test]
    fn cancels_across_commuting_opposite_face() {
        assert_eq!(simp("R L R'"), "L");
        assert_eq!(simp("R L R' L'"), "");
        assert_eq!(simp("U D2 U'"), "D2");
    }

    #[test]
    fn cancels_across_same_axis_slice() {
        assert_eq!(simp("R M R"), "R2 M");
        assert_eq!(simp("r x r'"), "x");
    }

    #[test]
    fn does_not_cancel_across_other_axes() {
        assert_eq!(simp("R U R'"), "R U R'");
        assert_eq!(simp("R F R'"), "R F R'");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(simplify(&[]).is_empty());
    }
}
