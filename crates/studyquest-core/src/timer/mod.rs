mod engine;

pub use engine::{SessionFinished, StudyTimer, TimerState, DEFAULT_FOCUS_MINUTES};
