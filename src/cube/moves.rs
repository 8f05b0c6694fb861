use std::collections::HashMap;
use std::sync::LazyLock;

use crate::cube::pattern::CubePattern;
use crate::notation::token::{Face, Layer, Modifier, MoveToken, RotationAxis, SliceLayer};

fn transform(
    corners_perm: [u8; 8],
    corners_ori: [u8; 8],
    edges_perm: [u8; 12],
    edges_ori: [u8; 12],
    centers: [u8; 6],
) -> CubePattern {
    CubePattern {
        corners_perm,
        corners_ori,
        edges_perm,
        edges_ori,
        centers,
    }
}

/// Quarter-turn transforms for the six faces plus the x/y rotations.
/// Everything else (z, slices, wides, primes, half turns) is composed from
/// these, so the composition identities hold by construction.
fn base_quarter(layer: Layer) -> CubePattern {
    let id_centers = [0, 1, 2, 3, 4, 5];
    match layer {
        Layer::Outer(Face::U) => transform(
            [3, 0, 1, 2, 4, 5, 6, 7],
            [0; 8],
            [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
            [0; 12],
            id_centers,
        ),
        Layer::Outer(Face::D) => transform(
            [0, 1, 2, 3, 5, 6, 7, 4],
            [0; 8],
            [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
            [0; 12],
            id_centers,
        ),
        Layer::Outer(Face::R) => transform(
            [4, 1, 2, 0, 7, 5, 6, 3],
            [2, 0, 0, 1, 1, 0, 0, 2],
            [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
            [0; 12],
            id_centers,
        ),
        Layer::Outer(Face::L) => transform(
            [0, 2, 6, 3, 4, 1, 5, 7],
            [0, 1, 2, 0, 0, 2, 1, 0],
            [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
            [0; 12],
            id_centers,
        ),
        Layer::Outer(Face::F) => transform(
            [1, 5, 2, 3, 0, 4, 6, 7],
            [1, 2, 0, 0, 2, 1, 0, 0],
            [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
            [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
            id_centers,
        ),
        Layer::Outer(Face::B) => transform(
            [0, 1, 3, 7, 4, 5, 2, 6],
            [0, 0, 1, 2, 0, 0, 2, 1],
            [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
            [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
            id_centers,
        ),
        Layer::Rotation(RotationAxis::X) => transform(
            [4, 5, 1, 0, 7, 6, 2, 3],
            [2, 1, 2, 1, 1, 2, 1, 2],
            [8, 5, 9, 1, 11, 7, 10, 3, 4, 6, 2, 0],
            [0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0],
            [2, 1, 5, 3, 0, 4],
        ),
        Layer::Rotation(RotationAxis::Y) => transform(
            [3, 0, 1, 2, 7, 4, 5, 6],
            [0; 8],
            [3, 0, 1, 2, 7, 4, 5, 6, 11, 8, 9, 10],
            [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
            [0, 2, 3, 4, 1, 5],
        ),
        _ => unreachable!("derived layer passed to base_quarter"),
    }
}

fn prime(t: &CubePattern) -> CubePattern {
    t.apply(t).apply(t)
}

fn quarter(layer: Layer) -> CubePattern {
    let face = |f: Face| base_quarter(Layer::Outer(f));
    let x = || base_quarter(Layer::Rotation(RotationAxis::X));
    let y = || base_quarter(Layer::Rotation(RotationAxis::Y));
    let z = || x().apply(&y()).apply(&prime(&x()));
    match layer {
        Layer::Outer(_) | Layer::Rotation(RotationAxis::X) | Layer::Rotation(RotationAxis::Y) => {
            base_quarter(layer)
        }
        Layer::Rotation(RotationAxis::Z) => z(),
        // A slice is the whole-cube rotation with both outer layers
        // turned back; same-axis turns commute so the order is free.
        Layer::Slice(SliceLayer::M) => prime(&x()).apply(&face(Face::R)).apply(&prime(&face(Face::L))),
        Layer::Slice(SliceLayer::E) => prime(&y()).apply(&face(Face::U)).apply(&prime(&face(Face::D))),
        Layer::Slice(SliceLayer::S) => z().apply(&prime(&face(Face::F))).apply(&face(Face::B)),
        // A wide turn is the rotation with the far outer layer turned back.
        Layer::Wide(Face::R) => x().apply(&face(Face::L)),
        Layer::Wide(Face::L) => prime(&x()).apply(&face(Face::R)),
        Layer::Wide(Face::U) => y().apply(&face(Face::D)),
        Layer::Wide(Face::D) => prime(&y()).apply(&face(Face::U)),
        Layer::Wide(Face::F) => z().apply(&face(Face::B)),
        Layer::Wide(Face::B) => prime(&z()).apply(&face(Face::F)),
    }
}

static MOVE_TABLE: LazyLock<HashMap<MoveToken, CubePattern>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for layer in Layer::all() {
        let q = quarter(layer);
        let half = q.apply(&q);
        table.insert(MoveToken::new(layer, Modifier::Plain), q.clone());
        table.insert(MoveToken::new(layer, Modifier::Prime), prime(&q));
        table.insert(MoveToken::new(layer, Modifier::Double), half.clone());
        table.insert(MoveToken::new(layer, Modifier::DoublePrime), half);
    }
    table
});

/// Apply a single move. Pure; the input pattern is untouched.
pub fn apply_move(pattern: &CubePattern, token: MoveToken) -> CubePattern {
    pattern.apply(&MOVE_TABLE[&token])
}

pub fn apply_alg(pattern: &CubePattern, tokens: &[MoveToken]) -> CubePattern {
    tokens
        .iter()
        .fold(pattern.clone(), |state, &t| apply_move(&state, t))
}
