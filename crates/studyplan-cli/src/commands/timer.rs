use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use studyplan_core::storage::data_dir;
use studyplan_core::{Config, Phase, PomodoroTimer, TimerEvent, TimerState};

const TIMER_FILE: &str = "timer.json";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown, or pause it if it is running
    Toggle,
    /// Back to an idle work phase
    Reset,
    /// Print the current phase and remaining time
    Status {
        /// Print JSON instead of a status line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Snapshot {
    phase: Phase,
    state: TimerState,
    remaining: String,
    remaining_ms: u64,
}

impl Snapshot {
    fn of(timer: &PomodoroTimer) -> Self {
        Self {
            phase: timer.phase(),
            state: timer.state(),
            remaining: timer.display(),
            remaining_ms: timer.remaining_ms(),
        }
    }
}

fn timer_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(data_dir()?.join(TIMER_FILE))
}

fn load_timer(path: &Path, config: &Config) -> PomodoroTimer {
    if let Ok(json) = std::fs::read_to_string(path) {
        match serde_json::from_str::<PomodoroTimer>(&json) {
            Ok(timer) => return timer,
            Err(e) => tracing::warn!("discarding unreadable timer state: {e}"),
        }
    }
    PomodoroTimer::from_config(&config.timer)
}

fn save_timer(path: &Path, timer: &PomodoroTimer) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, serde_json::to_string(timer)?)?;
    Ok(())
}

fn status_line(timer: &PomodoroTimer) -> String {
    let state = match timer.state() {
        TimerState::Idle => "idle",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
    };
    format!("{} {} {state}", timer.phase().label(), timer.display())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let path = timer_path()?;
    let mut timer = load_timer(&path, &config);
    let now = Utc::now();

    if let Some(TimerEvent::PhaseCompleted { finished, next }) = timer.tick(now) {
        println!("{} finished, {} is up", finished.label(), next.label());
    }

    match action {
        TimerAction::Toggle => {
            timer.toggle(now);
            println!("{}", status_line(&timer));
        }
        TimerAction::Reset => {
            // Picks up changed phase lengths from config.
            timer = PomodoroTimer::from_config(&config.timer);
            println!("{}", status_line(&timer));
        }
        TimerAction::Status { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&Snapshot::of(&timer))?);
            } else {
                println!("{}", status_line(&timer));
            }
        }
    }

    save_timer(&path, &timer)?;
    Ok(())
}
