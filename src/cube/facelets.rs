use thiserror::Error;

use crate::cube::pattern::CubePattern;

pub const SOLVED_FACELETS: &str =
    "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FaceletError {
    #[error("facelet string must be 54 characters, got {0}")]
    BadLength(usize),
    #[error("unknown facelet color: {0}")]
    BadColor(char),
    #[error("facelets do not form a valid cube state")]
    Unsolvable,
}

// Facelet indices per cubie slot, in the URFDLB string order the hardware
// reports (9 stickers per face: U 0-8, R 9-17, F 18-26, D 27-35, L 36-44,
// B 45-53). First facelet of each corner is its U/D sticker reference.
const CORNER_FACELETS: [[usize; 3]; 8] = [
    [8, 9, 20],   // URF
    [6, 18, 38],  // UFL
    [0, 36, 47],  // ULB
    [2, 45, 11],  // UBR
    [29, 26, 15], // DFR
    [27, 44, 24], // DLF
    [33, 53, 42], // DBL
    [35, 17, 51], // DRB
];

const EDGE_FACELETS: [[usize; 2]; 12] = [
    [5, 10],  // UR
    [7, 19],  // UF
    [3, 37],  // UL
    [1, 46],  // UB
    [32, 16], // DR
    [28, 25], // DF
    [30, 43], // DL
    [34, 52], // DB
    [23, 12], // FR
    [21, 41], // FL
    [50, 39], // BL
    [48, 14], // BR
];

const CORNER_COLORS: [[u8; 3]; 8] = [
    [0, 3, 2], // URF
    [0, 2, 1], // UFL
    [0, 1, 4], // ULB
    [0, 4, 3], // UBR
    [5, 2, 3], // DFR
    [5, 1, 2], // DLF
    [5, 4, 1], // DBL
    [5, 3, 4], // DRB
];

const EDGE_COLORS: [[u8; 2]; 12] = [
    [0, 3],
    [0, 2],
    [0, 1],
    [0, 4],
    [5, 3],
    [5, 2],
    [5, 1],
    [5, 4],
    [2, 3],
    [2, 1],
    [4, 1],
    [4, 3],
];

const CENTER_FACELETS: [usize; 6] = [4, 40, 22, 13, 49, 31]; // U L F R B D

fn color_index(ch: char) -> Result<u8, FaceletError> {
    Ok(match ch {
        'U' => 0,
        'L' => 1,
        'F' => 2,
        'R' => 3,
        'B' => 4,
        'D' => 5,
        other => return Err(FaceletError::BadColor(other)),
    })
}

/// Convert a hardware facelet snapshot into a pattern. This is the
/// one-time FACELETS bootstrap; every later state comes from applying
/// moves to it.
pub fn facelets_to_pattern(facelets: &str) -> Result<CubePattern, FaceletError> {
    let chars: Vec<char> = facelets.chars().collect();
    if chars.len() != 54 {
        return Err(FaceletError::BadLength(chars.len()));
    }
    let colors: Vec<u8> = chars
        .iter()
        .map(|&ch| color_index(ch))
        .collect::<Result<_, _>>()?;

    let mut pattern = CubePattern::solved();

    for (slot, facelet_indices) in CORNER_FACELETS.iter().enumerate() {
        // Twist the slot until the U/D sticker is in the reference spot,
        // then the remaining two colors identify the piece.
        let ori = (0..3)
            .find(|&o| matches!(colors[facelet_indices[o]], 0 | 5))
            .ok_or(FaceletError::Unsolvable)?;
        let a = colors[facelet_indices[(ori + 1) % 3]];
        let b = colors[facelet_indices[(ori + 2) % 3]];
        let piece = CORNER_COLORS
            .iter()
            .position(|c| c[1] == a && c[2] == b)
            .ok_or(FaceletError::Unsolvable)?;
        pattern.corners_perm[slot] = piece as u8;
        pattern.corners_ori[slot] = ori as u8;
    }

    for (slot, facelet_indices) in EDGE_FACELETS.iter().enumerate() {
        let pair = [colors[facelet_indices[0]], colors[facelet_indices[1]]];
        let (piece, flip) = EDGE_COLORS
            .iter()
            .enumerate()
            .find_map(|(j, c)| {
                if *c == pair {
                    Some((j, 0))
                } else if c[0] == pair[1] && c[1] == pair[0] {
                    Some((j, 1))
                } else {
                    None
                }
            })
            .ok_or(FaceletError::Unsolvable)?;
        pattern.edges_perm[slot] = piece as u8;
        pattern.edges_ori[slot] = flip;
    }

    for (slot, &facelet) in CENTER_FACELETS.iter().enumerate() {
        pattern.centers[slot] = colors[facelet];
    }

    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::moves::apply_alg;
    use crate::notation::parse_alg;

    #[test]
    fn solved_facelets_give_solved_pattern() {
        let pattern = facelets_to_pattern(SOLVED_FACELETS).unwrap();
        assert!(pattern.is_solved());
    }

    #[test]
    fn rejects_malformed_snapshots() {
        assert_eq!(
            facelets_to_pattern("UUU"),
            Err(FaceletError::BadLength(3))
        );
        let junk = "Q".repeat(54);
        assert_eq!(facelets_to_pattern(&junk), Err(FaceletError::BadColor('Q')));
    }

    #[test]
    fn scrambled_snapshot_round_trips_through_moves() {
        // Facelet string for the state after R, transcribed by hand:
        // R leaves U's left two columns, pulls F's right column up, etc.
        let after_r = "UUFUUFUUFRRRRRRRRRFFDFFDFFDDDBDDBDDBLLLLLLLLLUBBUBBUBB";
        let expected = apply_alg(
            &CubePattern::solved(),
            &parse_alg("R").unwrap(),
        );
        assert_eq!(facelets_to_pattern(after_r).unwrap(), expected);
    }
}
