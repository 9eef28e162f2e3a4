//! Classification of how an event's range meets a calendar day.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::event::CalendarEvent;

/// Relationship between one event and one day, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMembership {
    /// No overlap with the day.
    Invisible,
    /// Starts and ends on this day.
    Single,
    /// Starts on this day, ends later.
    StartDay,
    /// Ends on this day, started earlier.
    EndDay,
    /// Started before and ends after this day.
    ThroughDay,
    /// Anything else; drawn as a full day.
    Fallback,
}

impl DayMembership {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Invisible)
    }
}

/// Event bounds as wall-clock times in the display time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl LocalSpan {
    pub fn of<Tz: TimeZone>(event: &CalendarEvent, tz: &Tz) -> Self {
        Self {
            start: local(&event.start_time, tz),
            end: local(&event.end_time, tz),
        }
    }
}

fn local<Tz: TimeZone, Src: TimeZone>(instant: &DateTime<Src>, tz: &Tz) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Classify `span` against `day` (`[day 00:00, day+1 00:00)`).
pub fn classify_span(span: &LocalSpan, day: NaiveDate) -> DayMembership {
    let day_start = day.and_time(chrono::NaiveTime::MIN);
    let day_end = day_start + Duration::days(1);

    if span.end <= day_start || span.start >= day_end {
        return DayMembership::Invisible;
    }

    let start_day = span.start.date();
    let end_day = span.end.date();

    if start_day == day && end_day == day {
        if span.end < span.start {
            return DayMembership::Fallback;
        }
        DayMembership::Single
    } else if start_day == day && end_day > day {
        DayMembership::StartDay
    } else if end_day == day && start_day < day {
        DayMembership::EndDay
    } else if start_day < day && end_day > day {
        DayMembership::ThroughDay
    } else {
        DayMembership::Fallback
    }
}

/// Classify an event against a day in the given time zone.
pub fn classify<Tz: TimeZone>(event: &CalendarEvent, day: NaiveDate, tz: &Tz) -> DayMembership {
    classify_span(&LocalSpan::of(event, tz), day)
}
