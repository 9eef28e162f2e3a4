//! Vertical placement of event blocks inside a day column.
//!
//! Positions are percentages of a 24-hour day. Very short blocks are
//! stretched to a minimum visible height, and blocks below the label
//! threshold render their title only.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::membership::{DayMembership, LocalSpan};

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Minimum block height in display pixels.
pub const MIN_BLOCK_PX: f64 = 2.0;

/// Assumptions about the rendered column used for the visibility rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    /// Pixel height of a full day column.
    pub column_height_px: f64,
    /// Height (percent) below which the time subtitle is hidden.
    pub label_threshold_percent: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            column_height_px: 960.0,
            label_threshold_percent: 6.0,
        }
    }
}

impl GeometryConfig {
    /// Height floor in percent: `2px / column height`.
    pub fn min_height_percent(&self) -> f64 {
        if self.column_height_px <= 0.0 {
            return 0.0;
        }
        MIN_BLOCK_PX / self.column_height_px * 100.0
    }

    /// Whether a block of `height_percent` has room for the subtitle.
    pub fn shows_subtitle(&self, height_percent: f64) -> bool {
        height_percent >= self.label_threshold_percent
    }
}

/// Position of a block, both values in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub top: f64,
    pub height: f64,
}

impl BlockGeometry {
    pub const FULL_DAY: BlockGeometry = BlockGeometry {
        top: 0.0,
        height: 100.0,
    };

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical spans intersect (touching edges do not count).
    pub fn overlaps(&self, other: &BlockGeometry) -> bool {
        self.top < other.bottom() && other.top < self.bottom()
    }
}

/// Minutes since local midnight, with second precision.
pub fn minutes_from_midnight(time: &NaiveDateTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / 60.0
}

fn percent(minutes: f64) -> f64 {
    minutes / MINUTES_PER_DAY * 100.0
}

/// Compute the block for one day, before the height floor is applied.
pub fn raw_geometry(span: &LocalSpan, membership: DayMembership) -> Option<BlockGeometry> {
    let geometry = match membership {
        DayMembership::Invisible => return None,
        DayMembership::Single => {
            let minutes = (span.end - span.start).num_seconds() as f64 / 60.0;
            BlockGeometry {
                top: percent(minutes_from_midnight(&span.start)),
                height: percent(minutes),
            }
        }
        DayMembership::StartDay => {
            let start = minutes_from_midnight(&span.start);
            BlockGeometry {
                top: percent(start),
                height: percent(MINUTES_PER_DAY - start),
            }
        }
        DayMembership::EndDay => BlockGeometry {
            top: 0.0,
            height: percent(minutes_from_midnight(&span.end)),
        },
        DayMembership::ThroughDay | DayMembership::Fallback => BlockGeometry::FULL_DAY,
    };
    Some(geometry)
}

/// Compute the block for one day with the minimum-height floor applied.
pub fn block_geometry(
    span: &LocalSpan,
    membership: DayMembership,
    config: &GeometryConfig,
) -> Option<BlockGeometry> {
    raw_geometry(span, membership).map(|mut g| {
        g.height = g.height.max(config.min_height_percent());
        g
    })
}
