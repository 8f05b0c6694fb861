pub mod projector;
pub mod recovery;
pub mod tracker;

pub use projector::{Checkpoints, fix_orientation, project};
pub use recovery::{RECOVERY_RULES, RecoveryRule, RuleEffect, RuleInput};
pub use tracker::{DisplaySnapshot, MistakeTracker, MoveColor, TrackOutcome};
