//! Pomodoro timer state machine.
//!
//! The timer alternates between a work phase and a break phase. It is
//! driven by wall-clock deltas: there is no internal thread, the caller
//! passes `now` into every command and calls `tick()` as often as it
//! redraws.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running --(phase time used up)--> Idle, next phase loaded
//! any --reset--> Idle, work phase
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::TimerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }

    fn next(&self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// What a command or tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { phase: Phase, remaining_ms: u64 },
    Paused { remaining_ms: u64 },
    Reset,
    /// A phase ran out; the timer stopped with `next` loaded.
    PhaseCompleted { finished: Phase, next: Phase },
}

/// Work/break countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroTimer {
    work_ms: u64,
    break_ms: u64,
    phase: Phase,
    state: TimerState,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    /// Instant up to which `remaining_ms` has been brought current.
    #[serde(default)]
    last_tick: Option<DateTime<Utc>>,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::from_config(&TimerConfig::default())
    }
}

impl PomodoroTimer {
    /// Idle timer at the start of a work phase.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let work_ms = minutes_ms(work_minutes);
        Self {
            work_ms,
            break_ms: minutes_ms(break_minutes),
            phase: Phase::Work,
            state: TimerState::Idle,
            remaining_ms: work_ms,
            last_tick: None,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(config.work_minutes, config.break_minutes)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Whole seconds left, rounded up so a fresh phase reads `25:00`.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    /// Remaining time as `mm:ss`.
    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if self.state == TimerState::Running {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick = Some(now);
        Some(TimerEvent::Started {
            phase: self.phase,
            remaining_ms: self.remaining_ms,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        self.state = TimerState::Paused;
        self.last_tick = None;
        Some(TimerEvent::Paused {
            remaining_ms: self.remaining_ms,
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        match self.state {
            TimerState::Running => self.pause(now),
            TimerState::Idle | TimerState::Paused => self.start(now),
        }
    }

    /// Back to an idle work phase with the full duration.
    pub fn reset(&mut self) -> TimerEvent {
        self.state = TimerState::Idle;
        self.phase = Phase::Work;
        self.remaining_ms = self.work_ms;
        self.last_tick = None;
        TimerEvent::Reset
    }

    /// Bring the countdown up to `now`. Returns `PhaseCompleted` when the
    /// running phase ran out; time past zero is not carried over.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_ms > 0 {
            return None;
        }

        let finished = self.phase;
        self.phase = finished.next();
        self.remaining_ms = self.phase_ms(self.phase);
        self.state = TimerState::Idle;
        self.last_tick = None;
        tracing::debug!("{} phase finished", finished.label());
        Some(TimerEvent::PhaseCompleted {
            finished,
            next: self.phase,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn phase_ms(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_ms,
            Phase::Break => self.break_ms,
        }
    }

    fn flush_elapsed(&mut self, now: DateTime<Utc>) {
        if let Some(last) = self.last_tick {
            let elapsed = u64::try_from((now - last).num_milliseconds()).unwrap_or(0);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick = Some(now.max(last));
        }
    }
}

fn minutes_ms(minutes: u32) -> u64 {
    u64::from(minutes) * 60_000
}

/// Format seconds as zero-padded `mm:ss`; minutes are not wrapped at 60.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
