//! Recurring personal time-blockers.
//!
//! A blocker is stored once with its first occurrence and a repetition
//! rule. Before layout it is expanded into `PERSONAL` events for the
//! visible days.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::event::{parse_timestamp, CalendarEvent, EventType};
use crate::error::ValidationError;

/// Repetition rule of a blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occurrence {
    #[default]
    Once,
    Daily,
    Weekly,
    /// Same day of month; months without that day are skipped.
    Monthly,
}

/// A blocker as returned by `/api/timeblockers/my`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeblocker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "start_date")]
    pub start_date: String,
    #[serde(alias = "end_date")]
    pub end_date: String,
    #[serde(default)]
    pub occurrence: Occurrence,
}

impl Timeblocker {
    fn bounds(&self) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), ValidationError> {
        let start = parse_timestamp("startDate", &self.start_date)?;
        let end = parse_timestamp("endDate", &self.end_date)?;
        if end < start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok((start, end))
    }

    /// Occurrences intersecting `[first_day, last_day]` in the display zone.
    pub fn occurrences_within<Tz: TimeZone>(
        &self,
        first_day: NaiveDate,
        last_day: NaiveDate,
        tz: &Tz,
    ) -> Result<Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)>, ValidationError> {
        let (start, end) = self.bounds()?;
        let length = end - start;
        let window_start = first_day.and_time(NaiveTime::MIN);
        let window_end = (last_day + Duration::days(1)).and_time(NaiveTime::MIN);
        let local = |t: &DateTime<FixedOffset>| -> NaiveDateTime { t.with_timezone(tz).naive_local() };

        let mut found = Vec::new();
        let mut keep = |s: DateTime<FixedOffset>| {
            let e = s + length;
            if local(&e) > window_start || (length == Duration::zero() && local(&s) >= window_start) {
                found.push((s, e));
            }
        };

        match self.occurrence {
            Occurrence::Once => {
                if local(&start) < window_end {
                    keep(start);
                }
            }
            Occurrence::Daily | Occurrence::Weekly => {
                let step = if self.occurrence == Occurrence::Daily { 1 } else { 7 };
                let lag = (window_start - local(&end)).num_days();
                let mut k = (lag / step - 1).max(0);
                loop {
                    let s = start + Duration::days(k * step);
                    if local(&s) >= window_end {
                        break;
                    }
                    keep(s);
                    k += 1;
                }
            }
            Occurrence::Monthly => {
                let lag = (first_day.year() - start.year()) * 12 + first_day.month() as i32
                    - start.month() as i32
                    - 1;
                let mut k = lag.max(0) as u32;
                while let Some(s) = start.checked_add_months(Months::new(k)) {
                    if local(&s) >= window_end {
                        break;
                    }
                    if s.day() == start.day() {
                        keep(s);
                    }
                    k += 1;
                }
            }
        }

        Ok(found)
    }

    /// Expand into `PERSONAL` events for the given days.
    pub fn to_events<Tz: TimeZone>(
        &self,
        first_day: NaiveDate,
        last_day: NaiveDate,
        tz: &Tz,
    ) -> Result<Vec<CalendarEvent>, ValidationError> {
        self.occurrences_within(first_day, last_day, tz)?
            .into_iter()
            .map(|(start, end)| {
                let mut event = CalendarEvent::new(self.name.clone(), start, end, EventType::Personal)?
                    .with_id(format!("{}@{}", self.id, start.date_naive()));
                if !self.description.is_empty() {
                    event.description = Some(self.description.clone());
                }
                Ok(event)
            })
            .collect()
    }
}

/// Expand every blocker, logging and skipping malformed ones.
pub fn expand_all<Tz: TimeZone>(
    blockers: &[Timeblocker],
    first_day: NaiveDate,
    last_day: NaiveDate,
    tz: &Tz,
) -> Vec<CalendarEvent> {
    blockers
        .iter()
        .flat_map(|blocker| match blocker.to_events(first_day, last_day, tz) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("skipping timeblocker '{}': {e}", blocker.name);
                Vec::new()
            }
        })
        .collect()
}
