pub mod algorithm;
pub mod scheduler;
pub mod session;
pub mod timer;

pub use algorithm::Algorithm;
pub use scheduler::{DrillQueue, QueueOptions};
pub use session::{SessionOutcome, TrainingSession, with_random_auf};
pub use timer::{SolveTimer, TimerState, fitted_duration_ms, format_time};
