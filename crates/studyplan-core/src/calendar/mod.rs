//! Calendar layout engine.
//!
//! Turns a list of events and a visible window into per-day columns of
//! positioned, coloured blocks:
//!
//! - [`range`]: week/month date ranges and the caller-owned visible window
//! - [`membership`]: how an event meets a given day
//! - [`geometry`]: top/height percentages with the visibility rules
//! - [`color`]: palette tokens, hex literals and alpha blending
//! - [`layout`]: composition of the above, including overlap lanes
//! - [`scroll`]: scroll-to-event targeting and transient highlight
//! - [`timeblocker`]: expansion of recurring personal blockers

pub mod color;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod membership;
pub mod range;
pub mod scroll;
pub mod timeblocker;

use chrono::{NaiveDate, TimeZone};

pub use color::{Color, NamedColor, Rgba};
pub use event::{ingest, CalendarEvent, Course, EventRecord, EventType};
pub use geometry::{BlockGeometry, GeometryConfig};
pub use layout::{layout_day, layout_days, layout_window, DayColumn, EventBlock, LayoutConfig};
pub use membership::{classify, DayMembership};
pub use range::{month_grid, week_dates, week_start, Direction, VisibleWindow, WindowMode};
pub use scroll::{anchor_id, plan_scroll, HighlightTracker, ScrollPlan, ScrollRequest};
pub use timeblocker::{expand_all, Occurrence, Timeblocker};

/// Events starting on `date` in the display zone, ordered by start.
pub fn events_on<'a, Tz: TimeZone>(
    date: NaiveDate,
    events: &'a [CalendarEvent],
    tz: &Tz,
) -> Vec<&'a CalendarEvent> {
    let mut found: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| e.start_time.with_timezone(tz).date_naive() == date)
        .collect();
    found.sort_by_key(|e| e.start_time);
    found
}
