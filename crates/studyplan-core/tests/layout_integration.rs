//! Integration tests for the calendar layout engine.
//!
//! These tests feed backend-shaped JSON through ingestion and layout and
//! check the resulting block positions, colours and labels.

use chrono::{NaiveDate, Utc};
use studyplan_core::calendar::{
    expand_all, ingest, layout_window, plan_scroll, Course, DayMembership, EventRecord,
    HighlightTracker, LayoutConfig, ScrollRequest, Timeblocker, VisibleWindow,
};

const EVENTS_JSON: &str = r##"[
    {
        "name": "Linear Algebra review",
        "description": "Chapters 3-4",
        "startTime": "2025-03-04T09:00:00Z",
        "endTime": "2025-03-04T11:00:00Z",
        "type": "AUTOMATIC",
        "courseId": "math"
    },
    {
        "name": "Hand-in",
        "startTime": "2025-03-05T14:00:00Z",
        "endTime": "2025-03-05T14:00:00Z",
        "type": "AUTOMATIC",
        "color": "#fff"
    },
    {
        "name": "Field trip",
        "startTime": "2025-03-06T18:00:00Z",
        "endTime": "2025-03-08T06:00:00Z",
        "type": "PERSONAL",
        "color": "purple"
    },
    {
        "name": "Broken",
        "startTime": "2025-03-06T18:00:00Z",
        "endTime": "2025-03-06T17:00:00Z",
        "type": "PERSONAL"
    },
    {
        "name": "Next month",
        "startTime": "2025-04-10T09:00:00Z",
        "endTime": "2025-04-10T10:00:00Z",
        "type": "AUTOMATIC"
    }
]"##;

const COURSES_JSON: &str = r#"[
    { "id": "math", "name": "Mathematics", "color": "teal" },
    { "id": "phys", "name": "Physics" }
]"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn fixture() -> (Vec<studyplan_core::CalendarEvent>, Vec<Course>) {
    let records: Vec<EventRecord> = serde_json::from_str(EVENTS_JSON).unwrap();
    let courses: Vec<Course> = serde_json::from_str(COURSES_JSON).unwrap();
    (ingest(records), courses)
}

#[test]
fn test_ingestion_drops_inverted_event() {
    let (events, _) = fixture();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.name != "Broken"));
}

#[test]
fn test_week_layout_end_to_end() {
    let (events, courses) = fixture();
    let window = VisibleWindow::week(date(2025, 3, 5));
    let config = LayoutConfig::default();
    let columns = layout_window(&events, &courses, &window, &Utc, &config);

    assert_eq!(columns.len(), 7);
    assert_eq!(columns[0].date, date(2025, 3, 2));

    // Tuesday: 09:00-11:00 in the course colour.
    let tuesday = &columns[2];
    assert_eq!(tuesday.blocks.len(), 1);
    let review = &tuesday.blocks[0];
    assert!(approx(review.geometry.top, 37.5));
    assert!(approx(review.geometry.height, 100.0 / 12.0));
    assert!(review.show_subtitle);
    assert_eq!(review.color.to_string(), "rgba(20, 184, 166, 0.35)");

    // Wednesday: zero-length hand-in stretched to the floor, title only.
    let hand_in = &columns[3].blocks[0];
    assert!(approx(hand_in.geometry.height, config.geometry.min_height_percent()));
    assert!(!hand_in.show_subtitle);
    assert_eq!(hand_in.color.to_string(), "rgba(255, 255, 255, 0.35)");

    // Thursday 18:00 -> Saturday 06:00: three blocks.
    let trip: Vec<_> = columns
        .iter()
        .flat_map(|c| c.blocks.iter().filter(|b| b.name == "Field trip"))
        .collect();
    assert_eq!(trip.len(), 3);
    assert_eq!(trip[0].membership, DayMembership::StartDay);
    assert!(approx(trip[0].geometry.top, 75.0) && approx(trip[0].geometry.height, 25.0));
    assert_eq!(trip[1].membership, DayMembership::ThroughDay);
    assert!(approx(trip[1].geometry.height, 100.0));
    assert_eq!(trip[2].membership, DayMembership::EndDay);
    assert!(approx(trip[2].geometry.top, 0.0) && approx(trip[2].geometry.height, 25.0));
    assert!(trip.iter().all(|b| b.anchor == trip[0].anchor));

    // April event never appears.
    assert!(columns
        .iter()
        .all(|c| c.blocks.iter().all(|b| b.name != "Next month")));
}

#[test]
fn test_layout_is_reproducible() {
    let (events, courses) = fixture();
    let window = VisibleWindow::week(date(2025, 3, 5));
    let config = LayoutConfig::default();
    let first = layout_window(&events, &courses, &window, &Utc, &config);
    let second = layout_window(&events, &courses, &window, &Utc, &config);
    assert_eq!(first, second);
}

#[test]
fn test_scroll_to_event_in_other_week() {
    let (events, courses) = fixture();
    let target = events.iter().find(|e| e.name == "Next month").unwrap();

    let window = VisibleWindow::week(date(2025, 3, 5));
    let plan = plan_scroll(&window, &ScrollRequest::for_event(target), &Utc);
    assert!(plan.shifted);

    let columns = layout_window(&events, &courses, &plan.window, &Utc, &LayoutConfig::default());
    let found = columns
        .iter()
        .flat_map(|c| c.blocks.iter())
        .find(|b| b.anchor == plan.anchor);
    assert!(found.is_some());

    let mut tracker = HighlightTracker::default();
    let now = Utc::now();
    tracker.activate(plan.anchor.clone(), now);
    assert!(tracker.is_highlighted(&plan.anchor, now));
    assert!(!tracker.is_highlighted(&plan.anchor, now + chrono::Duration::seconds(3)));
}

#[test]
fn test_timeblockers_join_the_layout() {
    let blockers: Vec<Timeblocker> = serde_json::from_str(
        r#"[{
            "id": "gym",
            "name": "Gym",
            "description": "",
            "startDate": "2025-01-07T18:00:00Z",
            "endDate": "2025-01-07T19:30:00Z",
            "occurrence": "WEEKLY"
        }]"#,
    )
    .unwrap();

    let window = VisibleWindow::week(date(2025, 3, 5));
    let days = window.days();
    let mut events = expand_all(&blockers, days[0], days[6], &Utc);
    assert_eq!(events.len(), 1);

    let (fetched, courses) = fixture();
    events.extend(fetched);
    let columns = layout_window(&events, &courses, &window, &Utc, &LayoutConfig::default());
    let tuesday = &columns[2];
    assert_eq!(tuesday.blocks.len(), 2);
    assert!(tuesday.blocks.iter().any(|b| b.name == "Gym" && b.time_label == "18:00 - 19:30"));
}
