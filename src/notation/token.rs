use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty move token")]
    Empty,
    #[error("unknown move layer: {0}")]
    UnknownLayer(char),
    #[error("invalid move modifier: {0:?}")]
    InvalidModifier(String),
}

/// The six outer faces. Only these have an opposite-face counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::L => Face::R,
            Face::R => Face::L,
            Face::F => Face::B,
            Face::B => Face::F,
        }
    }

    fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::D => 'D',
            Face::L => 'L',
            Face::R => 'R',
            Face::F => 'F',
            Face::B => 'B',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliceLayer {
    M,
    E,
    S,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

/// Which slab of the puzzle a token turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Outer(Face),
    Wide(Face),
    Slice(SliceLayer),
    Rotation(RotationAxis),
}

/// Rotation axis shared by commuting layers: R/L/M/x turn about X,
/// U/D/E/y about Y, F/B/S/z about Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Layer {
    pub fn axis(self) -> Axis {
        match self {
            Layer::Outer(Face::R) | Layer::Outer(Face::L) => Axis::X,
            Layer::Outer(Face::U) | Layer::Outer(Face::D) => Axis::Y,
            Layer::Outer(Face::F) | Layer::Outer(Face::B) => Axis::Z,
            Layer::Wide(Face::R) | Layer::Wide(Face::L) => Axis::X,
            Layer::Wide(Face::U) | Layer::Wide(Face::D) => Axis::Y,
            Layer::Wide(Face::F) | Layer::Wide(Face::B) => Axis::Z,
            Layer::Slice(SliceLayer::M) => Axis::X,
            Layer::Slice(SliceLayer::E) => Axis::Y,
            Layer::Slice(SliceLayer::S) => Axis::Z,
            Layer::Rotation(RotationAxis::X) => Axis::X,
            Layer::Rotation(RotationAxis::Y) => Axis::Y,
            Layer::Rotation(RotationAxis::Z) => Axis::Z,
        }
    }

    pub fn all() -> impl Iterator<Item = Layer> {
        const FACES: [Face; 6] = [Face::U, Face::D, Face::L, Face::R, Face::F, Face::B];
        FACES
            .iter()
            .map(|&f| Layer::Outer(f))
            .chain(FACES.iter().map(|&f| Layer::Wide(f)))
            .chain([
                Layer::Slice(SliceLayer::M),
                Layer::Slice(SliceLayer::E),
                Layer::Slice(SliceLayer::S),
                Layer::Rotation(RotationAxis::X),
                Layer::Rotation(RotationAxis::Y),
                Layer::Rotation(RotationAxis::Z),
            ])
    }

    fn letter(self) -> char {
        match self {
            Layer::Outer(f) => f.letter(),
            Layer::Wide(f) => f.letter().to_ascii_lowercase(),
            Layer::Slice(SliceLayer::M) => 'M',
            Layer::Slice(SliceLayer::E) => 'E',
            Layer::Slice(SliceLayer::S) => 'S',
            Layer::Rotation(RotationAxis::X) => 'x',
            Layer::Rotation(RotationAxis::Y) => 'y',
            Layer::Rotation(RotationAxis::Z) => 'z',
        }
    }

    fn from_letter(ch: char) -> Option<Layer> {
        Some(match ch {
            'U' => Layer::Outer(Face::U),
            'D' => Layer::Outer(Face::D),
            'L' => Layer::Outer(Face::L),
            'R' => Layer::Outer(Face::R),
            'F' => Layer::Outer(Face::F),
            'B' => Layer::Outer(Face::B),
            'u' => Layer::Wide(Face::U),
            'd' => Layer::Wide(Face::D),
            'l' => Layer::Wide(Face::L),
            'r' => Layer::Wide(Face::R),
            'f' => Layer::Wide(Face::F),
            'b' => Layer::Wide(Face::B),
            'M' => Layer::Slice(SliceLayer::M),
            'E' => Layer::Slice(SliceLayer::E),
            'S' => Layer::Slice(SliceLayer::S),
            'x' => Layer::Rotation(RotationAxis::X),
            'y' => Layer::Rotation(RotationAxis::Y),
            'z' => Layer::Rotation(RotationAxis::Z),
            _ => return None,
        })
    }
}

/// Turn amount suffix. `2` and `2'` reach the same state but are distinct
/// tokens; both are their own inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Plain,
    Prime,
    Double,
    DoublePrime,
}

impl Modifier {
    fn suffix(self) -> &'static str {
        match self {
            Modifier::Plain => "",
            Modifier::Prime => "'",
            Modifier::Double => "2",
            Modifier::DoublePrime => "2'",
        }
    }
}

/// A single atomic turn in canonical notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveToken {
    pub layer: Layer,
    pub modifier: Modifier,
}

impl MoveToken {
    pub fn new(layer: Layer, modifier: Modifier) -> Self {
        Self { layer, modifier }
    }

    /// Net quarter turns clockwise, mod 4.
    pub fn quarter_turns(self) -> u8 {
        match self.modifier {
            Modifier::Plain => 1,
            Modifier::Prime => 3,
            Modifier::Double | Modifier::DoublePrime => 2,
        }
    }

    /// Swap prime/plain; half turns are self-inverse.
    pub fn inverse(self) -> MoveToken {
        let modifier = match self.modifier {
            Modifier::Plain => Modifier::Prime,
            Modifier::Prime => Modifier::Plain,
            other => other,
        };
        MoveToken::new(self.layer, modifier)
    }

    /// Same turn on the opposite outer face. Only defined for outer faces;
    /// slices, wides and rotations have no opposite.
    pub fn opposite(self) -> Option<MoveToken> {
        match self.layer {
            Layer::Outer(face) => Some(MoveToken::new(Layer::Outer(face.opposite()), self.modifier)),
            _ => None,
        }
    }

    pub fn axis(self) -> Axis {
        self.layer.axis()
    }

    pub fn is_half_turn(self) -> bool {
        matches!(self.modifier, Modifier::Double | Modifier::DoublePrime)
    }

    /// Canonical token for a net quarter-turn count; `None` when the net
    /// effect is the identity.
    pub fn from_quarter_turns(layer: Layer, turns: u8) -> Option<MoveToken> {
        match turns % 4 {
            0 => None,
            1 => Some(MoveToken::new(layer, Modifier::Plain)),
            2 => Some(MoveToken::new(layer, Modifier::Double)),
            _ => Some(MoveToken::new(layer, Modifier::Prime)),
        }
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.layer.letter(), self.modifier.suffix())
    }
}

impl FromStr for MoveToken {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let head = chars.next().ok_or(NotationError::Empty)?;
        let layer = Layer::from_letter(head).ok_or(NotationError::UnknownLayer(head))?;
        let modifier = match chars.as_str() {
            "" => Modifier::Plain,
            "'" => Modifier::Prime,
            "2" => Modifier::Double,
            "2'" => Modifier::DoublePrime,
            rest => return Err(NotationError::InvalidModifier(rest.to_string())),
        };
        Ok(MoveToken::new(layer, modifier))
    }
}

impl From<MoveToken> for String {
    fn from(token: MoveToken) -> String {
        token.to_string()
    }
}

impl TryFrom<String> for MoveToken {
    type Error = NotationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Reverse the sequence and invert each token.
pub fn invert_alg(tokens: &[MoveToken]) -> Vec<MoveToken> {
    tokens.iter().rev().map(|t| t.inverse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODIFIERS: [Modifier; 4] = [
        Modifier::Plain,
        Modifier::Prime,
        Modifier::Double,
        Modifier::DoublePrime,
    ];

    #[test]
    fn inverse_is_an_involution_for_every_token() {
        for layer in Layer::all() {
            for modifier in MODIFIERS {
                let token = MoveToken::new(layer, modifier);
                assert_eq!(token.inverse().inverse(), token, "{token}");
            }
        }
    }

    #[test]
    fn opposite_is_an_involution_for_outer_faces() {
        for layer in Layer::all() {
            let token = MoveToken::new(layer, Modifier::Plain);
            match layer {
                Layer::Outer(_) => {
                    let opp = token.opposite().unwrap();
                    assert_eq!(opp.opposite(), Some(token));
                    assert_ne!(opp, token);
                }
                _ => assert_eq!(token.opposite(), None, "{token}"),
            }
        }
    }

    #[test]
    fn round_trips_through_display_and_parse() {
        for layer in Layer::all() {
            for modifier in MODIFIERS {
                let token = MoveToken::new(layer, modifier);
                assert_eq!(token.to_string().parse::<MoveToken>(), Ok(token));
            }
        }
    }

    #[test]
    fn half_turns_are_self_inverse() {
        let r2: MoveToken = "R2".parse().unwrap();
        assert_eq!(r2.inverse(), r2);
        let m2p: MoveToken = "M2'".parse().unwrap();
        assert_eq!(m2p.inverse(), m2p);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!("".parse::<MoveToken>(), Err(NotationError::Empty));
        assert!(matches!(
            "Q".parse::<MoveToken>(),
            Err(NotationError::UnknownLayer('Q'))
        ));
        assert!(matches!(
            "R'2".parse::<MoveToken>(),
            Err(NotationError::InvalidModifier(_))
        ));
    }

    #[test]
    fn opposite_faces_share_an_axis() {
        for face in [Face::U, Face::D, Face::L, Face::R, Face::F, Face::B] {
            let layer = Layer::Outer(face);
            assert_eq!(layer.axis(), Layer::Outer(face.opposite()).axis());
        }
    }
}
