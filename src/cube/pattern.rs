/// Permutation/orientation state of a 3x3x3.
///
/// Corner positions: URF UFL ULB UBR DFR DLF DBL DRB (twist mod 3).
/// Edge positions: UR UF UL UB DR DF DL DB FR FL BL BR (flip mod 2).
/// Center positions: U L F R B D. Face turns leave centers alone; slices,
/// wides and whole-cube rotations permute them, which is what the
/// orientation fix-up keys on.
///
/// The same struct doubles as a transformation (KPuzzle-style): a move is
/// just the pattern it produces from solved, and `apply` composes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CubePattern {
    pub corners_perm: [u8; 8],
    pub corners_ori: [u8; 8],
    pub edges_perm: [u8; 12],
    pub edges_ori: [u8; 12],
    pub centers: [u8; 6],
}

pub const SOLVED_CENTERS: [u8; 6] = [0, 1, 2, 3, 4, 5];

impl CubePattern {
    pub fn solved() -> Self {
        Self {
            corners_perm: [0, 1, 2, 3, 4, 5, 6, 7],
            corners_ori: [0; 8],
            edges_perm: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            edges_ori: [0; 12],
            centers: SOLVED_CENTERS,
        }
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// Whole-cube orientation is canonical when the centers read as the
    /// identity arrangement.
    pub fn centers_solved(&self) -> bool {
        self.centers == SOLVED_CENTERS
    }

    /// Exact state equality; the engine's `isIdentical`.
    pub fn is_identical(&self, other: &CubePattern) -> bool {
        self == other
    }

    /// Compose with a transformation: piece at `transform.perm[i]` moves
    /// into slot `i`, orientations add. Pure; returns a new pattern.
    pub fn apply(&self, transform: &CubePattern) -> CubePattern {
        let mut out = CubePattern::solved();
        for i in 0..8 {
            let from = transform.corners_perm[i] as usize;
            out.corners_perm[i] = self.corners_perm[from];
            out.corners_ori[i] = (self.corners_ori[from] + transform.corners_ori[i]) % 3;
        }
        for i in 0..12 {
            let from = transform.edges_perm[i] as usize;
            out.edges_perm[i] = self.edges_perm[from];
            out.edges_ori[i] = (self.edges_ori[from] + transform.edges_ori[i]) % 2;
        }
        for i in 0..6 {
            out.centers[i] = self.centers[transform.centers[i] as usize];
        }
        out
    }
}
