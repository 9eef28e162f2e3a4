mod engine;

pub use engine::{format_mmss, Phase, PomodoroTimer, TimerEvent, TimerState};
