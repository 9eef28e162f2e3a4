//! # Studyplan Core Library
//!
//! This library provides the calendar logic of the Studyplan study
//! planner. Scheduling, persistence and authentication live in the
//! backend; this crate turns what the backend returns into a weekly
//! calendar layout that any front end can draw.
//!
//! ## Architecture
//!
//! - **Calendar**: a stateless layout engine mapping events and a visible
//!   window to per-day columns of positioned, coloured blocks
//! - **Feed**: REST client for events, courses, time-blockers and
//!   assignments, and the trigger that asks the backend to plan one
//! - **Timer**: work/break pomodoro countdown
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`layout_window`]: the layout entry point
//! - [`VisibleWindow`]: caller-owned week / two-day window
//! - [`Color`]: palette token or hex literal
//! - [`ApiClient`]: backend access
//! - [`PomodoroTimer`]: focus timer state machine
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod feed;
pub mod storage;
pub mod timer;

pub use calendar::{
    layout_window, CalendarEvent, Color, Course, DayColumn, EventBlock, EventType, LayoutConfig,
    NamedColor, Timeblocker, VisibleWindow,
};
pub use error::{ConfigError, CoreError, FeedError, ValidationError};
pub use feed::{ApiClient, Assignment, Difficulty};
pub use storage::Config;
pub use timer::{Phase, PomodoroTimer, TimerEvent, TimerState};
