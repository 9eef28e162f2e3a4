//! Per-day layout of calendar events.
//!
//! `(events, visible days) -> columns of positioned blocks`. The function
//! is stateless: the caller owns the visible window and passes it in.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use super::color::Rgba;
use super::event::{CalendarEvent, Course, EventType};
use super::geometry::{block_geometry, BlockGeometry, GeometryConfig};
use super::membership::{classify_span, DayMembership, LocalSpan};
use super::range::VisibleWindow;
use super::scroll::anchor_id;

/// Slack for comparing percentages computed along different paths.
const EPSILON: f64 = 1e-9;

/// Layout settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub geometry: GeometryConfig,
    /// Alpha for normal block rendering.
    pub block_alpha: f32,
    /// Alpha for focused / highlighted rendering.
    pub focus_alpha: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            block_alpha: 0.35,
            focus_alpha: 0.85,
        }
    }
}

/// The part of one event shown on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBlock {
    /// Stable identifier used for scroll targeting.
    pub anchor: String,
    /// Index into the input event slice.
    pub event_index: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_type: EventType,
    pub membership: DayMembership,
    #[serde(flatten)]
    pub geometry: BlockGeometry,
    /// Horizontal slot among overlapping blocks.
    pub lane: usize,
    /// Slot count of the overlap cluster this block belongs to.
    pub lanes: usize,
    pub color: Rgba,
    pub focus_color: Rgba,
    pub show_subtitle: bool,
    /// `HH:MM - HH:MM` of the whole event.
    pub time_label: String,
}

/// All blocks of one visible day, ordered top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub blocks: Vec<EventBlock>,
}

/// Lay out every visible day of `window`.
pub fn layout_window<Tz: TimeZone>(
    events: &[CalendarEvent],
    courses: &[Course],
    window: &VisibleWindow,
    tz: &Tz,
    config: &LayoutConfig,
) -> Vec<DayColumn> {
    layout_days(events, courses, &window.days(), tz, config)
}

/// Lay out the given days in order.
pub fn layout_days<Tz: TimeZone>(
    events: &[CalendarEvent],
    courses: &[Course],
    days: &[NaiveDate],
    tz: &Tz,
    config: &LayoutConfig,
) -> Vec<DayColumn> {
    let spans: Vec<LocalSpan> = events.iter().map(|e| LocalSpan::of(e, tz)).collect();
    days.iter()
        .map(|&day| layout_column(events, &spans, courses, day, config))
        .collect()
}

/// Lay out a single day.
pub fn layout_day<Tz: TimeZone>(
    events: &[CalendarEvent],
    courses: &[Course],
    day: NaiveDate,
    tz: &Tz,
    config: &LayoutConfig,
) -> DayColumn {
    let spans: Vec<LocalSpan> = events.iter().map(|e| LocalSpan::of(e, tz)).collect();
    layout_column(events, &spans, courses, day, config)
}

fn layout_column(
    events: &[CalendarEvent],
    spans: &[LocalSpan],
    courses: &[Course],
    day: NaiveDate,
    config: &LayoutConfig,
) -> DayColumn {
    let mut blocks: Vec<EventBlock> = events
        .iter()
        .zip(spans)
        .enumerate()
        .filter_map(|(index, (event, span))| {
            let membership = classify_span(span, day);
            let geometry = block_geometry(span, membership, &config.geometry)?;
            let color = event.resolved_color(courses);
            Some(EventBlock {
                anchor: anchor_id(event),
                event_index: index,
                name: event.name.clone(),
                description: event.description.clone(),
                event_type: event.event_type,
                membership,
                geometry,
                lane: 0,
                lanes: 1,
                color: color.rgba(config.block_alpha),
                focus_color: color.rgba(config.focus_alpha),
                show_subtitle: config.geometry.shows_subtitle(geometry.height),
                time_label: format!(
                    "{} - {}",
                    span.start.format("%H:%M"),
                    span.end.format("%H:%M")
                ),
            })
        })
        .collect();

    assign_lanes(&mut blocks);
    DayColumn { date: day, blocks }
}

/// Sort blocks top-down and give overlapping ones distinct lanes.
fn assign_lanes(blocks: &mut [EventBlock]) {
    blocks.sort_by(|a, b| {
        a.geometry
            .top
            .total_cmp(&b.geometry.top)
            .then(b.geometry.height.total_cmp(&a.geometry.height))
            .then(a.event_index.cmp(&b.event_index))
    });

    let mut cluster_start = 0;
    let mut cluster_bottom = f64::NEG_INFINITY;
    let mut lane_bottoms: Vec<f64> = Vec::new();

    for i in 0..blocks.len() {
        let geometry = blocks[i].geometry;

        // A block starting below everything so far opens a new cluster.
        if !lane_bottoms.is_empty() && geometry.top + EPSILON >= cluster_bottom {
            close_cluster(&mut blocks[cluster_start..i], lane_bottoms.len());
            lane_bottoms.clear();
            cluster_start = i;
            cluster_bottom = f64::NEG_INFINITY;
        }

        let lane = match lane_bottoms.iter().position(|&bottom| bottom <= geometry.top + EPSILON) {
            Some(lane) => lane,
            None => {
                lane_bottoms.push(f64::NEG_INFINITY);
                lane_bottoms.len() - 1
            }
        };
        lane_bottoms[lane] = geometry.bottom();
        blocks[i].lane = lane;
        cluster_bottom = cluster_bottom.max(geometry.bottom());
    }

    let lanes = lane_bottoms.len();
    close_cluster(&mut blocks[cluster_start..], lanes);
}

fn close_cluster(cluster: &mut [EventBlock], lanes: usize) {
    for block in cluster {
        block.lanes = lanes.max(1);
    }
}
