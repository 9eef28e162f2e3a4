//! Calendar events and courses as the layout engine sees them.
//!
//! The backend delivers events with ISO-8601 strings ([`EventRecord`]);
//! they are validated into [`CalendarEvent`] at the ingestion boundary.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::error::ValidationError;

/// Origin of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Generated by the backend scheduler.
    Automatic,
    /// User-defined blocker.
    Personal,
}

/// A validated event with absolute start and end instants.
///
/// Deserialization goes through [`EventRecord`], so JSON input is held to
/// the same range check as [`CalendarEvent::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EventRecord")]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

impl CalendarEvent {
    /// Create an event, rejecting ranges whose end precedes the start.
    pub fn new(
        name: impl Into<String>,
        start_time: DateTime<FixedOffset>,
        end_time: DateTime<FixedOffset>,
        event_type: EventType,
    ) -> Result<Self, ValidationError> {
        if end_time < start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            id: None,
            name: name.into(),
            description: None,
            start_time,
            end_time,
            event_type,
            color: None,
            course_id: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Check if this event overlaps with a time range
    pub fn overlaps<Tz: TimeZone>(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
        self.start_time < *end && self.end_time > *start
    }

    /// Colour of this event: its own, else its course's, else blue.
    pub fn resolved_color(&self, courses: &[Course]) -> Color {
        if let Some(color) = &self.color {
            return color.clone();
        }
        self.course_id
            .as_deref()
            .and_then(|id| courses.iter().find(|c| c.id == id))
            .and_then(|course| course.color.clone())
            .unwrap_or_default()
    }
}

/// A course owned by the backend, read only for colour fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<Color>,
}

/// Wire form of an event as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub course_id: Option<String>,
}

impl TryFrom<EventRecord> for CalendarEvent {
    type Error = ValidationError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let start = parse_timestamp("startTime", &record.start_time)?;
        let end = parse_timestamp("endTime", &record.end_time)?;
        let mut event = CalendarEvent::new(record.name, start, end, record.event_type)?;
        event.id = record.id;
        event.description = record.description.filter(|d| !d.is_empty());
        event.color = record.color;
        event.course_id = record.course_id;
        Ok(event)
    }
}

/// Validate records, logging and dropping the ones that fail.
pub fn ingest(records: Vec<EventRecord>) -> Vec<CalendarEvent> {
    records
        .into_iter()
        .filter_map(|record| {
            let name = record.name.clone();
            match CalendarEvent::try_from(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("skipping event '{name}': {e}");
                    None
                }
            }
        })
        .collect()
}

/// Parse an RFC 3339 timestamp, keeping its offset.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|_| ValidationError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    })
}
