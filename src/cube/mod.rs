pub mod facelets;
pub mod moves;
pub mod pattern;
pub mod simplify;

pub use facelets::{FaceletError, SOLVED_FACELETS, facelets_to_pattern};
pub use moves::{apply_alg, apply_move};
pub use pattern::CubePattern;
pub use simplify::simplify;
