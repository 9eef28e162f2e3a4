//! Scroll-to-event targeting and the transient highlight that follows.
//!
//! Blocks are addressed by an anchor derived from the backend id when the
//! event has one, otherwise from `(name, start_time)`. Two id-less events
//! sharing name and start instant get the same anchor; the first rendered
//! block wins.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::event::CalendarEvent;
use super::range::VisibleWindow;

pub const ANCHOR_PREFIX: &str = "event-";

/// Default lifetime of the highlight after scrolling.
pub const DEFAULT_HIGHLIGHT_SECS: i64 = 2;

/// Anchor for an event's rendered blocks.
pub fn anchor_id(event: &CalendarEvent) -> String {
    match &event.id {
        Some(id) if !id.is_empty() => format!("{ANCHOR_PREFIX}{id}"),
        _ => composite_anchor(&event.name, &event.start_time),
    }
}

/// Anchor derived from `name + start_time` for events without an id.
pub fn composite_anchor(name: &str, start_time: &DateTime<FixedOffset>) -> String {
    let key = format!("{name}{}", start_time.to_rfc3339());
    format!("{ANCHOR_PREFIX}{}", URL_SAFE_NO_PAD.encode(key.as_bytes()))
}

/// Request to bring one event into view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRequest {
    #[serde(default)]
    pub event_id: Option<String>,
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
}

impl ScrollRequest {
    pub fn for_event(event: &CalendarEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            name: event.name.clone(),
            start_time: event.start_time,
        }
    }

    pub fn anchor(&self) -> String {
        match &self.event_id {
            Some(id) if !id.is_empty() => format!("{ANCHOR_PREFIX}{id}"),
            _ => composite_anchor(&self.name, &self.start_time),
        }
    }
}

/// Outcome of planning a scroll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollPlan {
    /// Window to display, possibly moved to the event's week.
    pub window: VisibleWindow,
    pub shifted: bool,
    pub anchor: String,
}

/// Decide which window to show so that the requested event is visible.
pub fn plan_scroll<Tz: TimeZone>(
    window: &VisibleWindow,
    request: &ScrollRequest,
    tz: &Tz,
) -> ScrollPlan {
    let date = request.start_time.with_timezone(tz).date_naive();
    let (window, shifted) = if window.contains(date) {
        (window.clone(), false)
    } else {
        tracing::debug!("scroll target on {date} outside visible window, shifting");
        (window.jump_to(date), true)
    };
    ScrollPlan {
        window,
        shifted,
        anchor: request.anchor(),
    }
}

/// Tracks the block highlighted after a scroll; expires on its own.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    duration: Duration,
    current: Option<(String, DateTime<Utc>)>,
}

impl Default for HighlightTracker {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_HIGHLIGHT_SECS))
    }
}

impl HighlightTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    /// Highlight `anchor` starting at `now`, replacing any previous one.
    pub fn activate(&mut self, anchor: impl Into<String>, now: DateTime<Utc>) {
        self.current = Some((anchor.into(), now));
    }

    /// The highlighted anchor at `now`, clearing it once expired.
    pub fn active(&mut self, now: DateTime<Utc>) -> Option<&str> {
        let expired = match &self.current {
            Some((_, started)) => now >= *started + self.duration,
            None => return None,
        };
        if expired {
            self.current = None;
            return None;
        }
        self.current.as_ref().map(|(anchor, _)| anchor.as_str())
    }

    /// When the current highlight lapses, if one was activated.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.current
            .as_ref()
            .map(|(_, started)| *started + self.duration)
    }

    pub fn is_highlighted(&mut self, anchor: &str, now: DateTime<Utc>) -> bool {
        self.active(now) == Some(anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::EventType;
    use chrono::NaiveDate;

    fn ts(value: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(start: &str) -> ScrollRequest {
        ScrollRequest {
            event_id: None,
            name: "Essay".into(),
            start_time: ts(start),
        }
    }

    #[test]
    fn composite_anchor_is_deterministic() {
        let a = composite_anchor("Essay", &ts("2025-03-04T09:00:00+00:00"));
        let b = composite_anchor("Essay", &ts("2025-03-04T09:00:00Z"));
        assert_eq!(a, b);
        assert!(a.starts_with(ANCHOR_PREFIX));
        assert!(a[ANCHOR_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn backend_id_takes_precedence() {
        let event = CalendarEvent::new(
            "Essay",
            ts("2025-03-04T09:00:00Z"),
            ts("2025-03-04T10:00:00Z"),
            EventType::Automatic,
        )
        .unwrap();
        let with_id = event.clone().with_id("42");
        assert_eq!(anchor_id(&with_id), "event-42");
        assert_ne!(anchor_id(&event), "event-42");
        assert_eq!(ScrollRequest::for_event(&event).anchor(), anchor_id(&event));
    }

    #[test]
    fn in_window_target_keeps_window() {
        let window = VisibleWindow::week(date(2025, 3, 5));
        let plan = plan_scroll(&window, &request("2025-03-07T09:00:00Z"), &Utc);
        assert!(!plan.shifted);
        assert_eq!(plan.window, window);
    }

    #[test]
    fn out_of_window_target_shifts_to_its_week() {
        let window = VisibleWindow::week(date(2025, 3, 5));
        let plan = plan_scroll(&window, &request("2025-04-16T09:00:00Z"), &Utc);
        assert!(plan.shifted);
        assert!(plan.window.contains(date(2025, 4, 16)));
        assert_eq!(plan.window.days()[0], date(2025, 4, 13));
    }

    #[test]
    fn two_day_window_shifts_when_target_is_later_in_week() {
        let window = VisibleWindow::two_day(date(2025, 3, 5), date(2025, 3, 5));
        let plan = plan_scroll(&window, &request("2025-03-08T09:00:00Z"), &Utc);
        assert!(plan.shifted);
        assert!(plan.window.contains(date(2025, 3, 8)));
    }

    #[test]
    fn highlight_reverts_after_duration() {
        let mut tracker = HighlightTracker::default();
        let t0 = ts("2025-03-04T09:00:00Z").with_timezone(&Utc);
        tracker.activate("event-1", t0);

        assert!(tracker.is_highlighted("event-1", t0 + Duration::milliseconds(1999)));
        assert_eq!(tracker.active(t0 + Duration::seconds(2)), None);
        assert_eq!(tracker.active(t0), None);
    }

    #[test]
    fn expiry_follows_configured_duration() {
        let mut tracker = HighlightTracker::new(Duration::seconds(5));
        assert_eq!(tracker.expires_at(), None);
        let t0 = ts("2025-03-04T09:00:00Z").with_timezone(&Utc);
        tracker.activate("event-1", t0);
        assert_eq!(tracker.expires_at(), Some(t0 + Duration::seconds(5)));
        assert!(tracker.is_highlighted("event-1", t0 + Duration::seconds(4)));
    }

    #[test]
    fn new_highlight_replaces_old() {
        let mut tracker = HighlightTracker::default();
        let t0 = ts("2025-03-04T09:00:00Z").with_timezone(&Utc);
        tracker.activate("event-1", t0);
        tracker.activate("event-2", t0 + Duration::seconds(1));
        assert_eq!(tracker.active(t0 + Duration::seconds(2)), Some("event-2"));
    }
}
