use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Args;
use serde::Serialize;

use studyplan_core::calendar::{
    plan_scroll, HighlightTracker, ScrollPlan, ScrollRequest, VisibleWindow,
};
use studyplan_core::Config;

use super::input::{resolve_offset, today};

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Event name
    #[arg(long)]
    pub name: String,
    /// Event start (RFC 3339)
    #[arg(long)]
    pub start: DateTime<FixedOffset>,
    /// Backend event id, when known
    #[arg(long)]
    pub id: Option<String>,
    /// Date the calendar currently shows (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// The calendar currently shows the two-day slice
    #[arg(long)]
    pub two_day: bool,
    /// Display offset from UTC in minutes
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

/// Scroll plan plus when the target block stops being highlighted.
#[derive(Serialize)]
struct LocateOutput {
    #[serde(flatten)]
    plan: ScrollPlan,
    highlight_until: Option<DateTime<Utc>>,
}

pub fn run(args: LocateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tz = resolve_offset(args.utc_offset, &config)?;

    let today = today(&tz);
    let current = args.date.unwrap_or(today);
    let window = if args.two_day || config.calendar.two_day {
        VisibleWindow::two_day(current, today)
    } else {
        VisibleWindow::week(current)
    };

    let request = ScrollRequest {
        event_id: args.id,
        name: args.name,
        start_time: args.start,
    };
    let plan = plan_scroll(&window, &request, &tz);

    let mut highlight = HighlightTracker::new(config.calendar.highlight_duration());
    highlight.activate(plan.anchor.clone(), Utc::now());
    let output = LocateOutput {
        highlight_until: highlight.expires_at(),
        plan,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
