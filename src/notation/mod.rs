pub mod normalize;
pub mod token;

pub use normalize::{display_tokens, normalize, parse_alg};
pub use token::{Axis, Face, Layer, Modifier, MoveToken, NotationError, invert_alg};
