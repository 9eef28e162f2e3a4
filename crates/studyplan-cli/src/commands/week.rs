use chrono::NaiveDate;
use clap::Args;

use studyplan_core::calendar::{layout_window, DayColumn, VisibleWindow};
use studyplan_core::Config;

use super::input::{today, SourceArgs};

#[derive(Args, Debug)]
pub struct WeekArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Any date in the week to show (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Date treated as "today" for the two-day slice
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Show only today and the following day
    #[arg(long)]
    pub two_day: bool,
    /// Page forward (positive) or back (negative) by whole weeks
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub weeks: i32,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: WeekArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tz = args.source.offset(&config)?;
    let today = args.today.unwrap_or_else(|| today(&tz));
    let reference = args.date.unwrap_or(today);

    let window = if args.two_day || config.calendar.two_day {
        VisibleWindow::two_day(reference, today)
    } else {
        VisibleWindow::week(reference)
    };
    let window = window
        .navigate_by(i64::from(args.weeks))
        .ok_or_else(|| format!("cannot page {} weeks from {reference}", args.weeks))?;

    let days = window.days();
    let (first, last) = match (days.iter().min(), days.iter().max()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err("visible window is empty".into()),
    };

    let loaded = args.source.load(&config, first, last, &tz)?;
    let columns = layout_window(
        &loaded.events,
        &loaded.courses,
        &window,
        &tz,
        &config.calendar.layout(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&columns)?);
    } else {
        print!("{}", render_table(&columns));
    }
    Ok(())
}

/// Plain-text rendering: one section per day, one line per block.
pub fn render_table(columns: &[DayColumn]) -> String {
    let mut out = String::new();
    for column in columns {
        out.push_str(&format!("{}\n", column.date.format("%a %Y-%m-%d")));
        if column.blocks.is_empty() {
            out.push_str("  (no events)\n");
        }
        for block in &column.blocks {
            let subtitle = if block.show_subtitle {
                format!("  {}", block.time_label)
            } else {
                String::new()
            };
            out.push_str(&format!(
                "  {:>6.2}% +{:>6.2}%  lane {}/{}  {}{}  [{}]\n",
                block.geometry.top,
                block.geometry.height,
                block.lane + 1,
                block.lanes,
                block.name,
                subtitle,
                block.color
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use studyplan_core::calendar::{layout_day, EventType, LayoutConfig};
    use studyplan_core::CalendarEvent;

    #[test]
    fn table_shows_subtitle_only_for_tall_blocks() {
        let events = vec![
            CalendarEvent::new(
                "Lecture",
                DateTime::parse_from_rfc3339("2025-03-04T09:00:00Z").unwrap(),
                DateTime::parse_from_rfc3339("2025-03-04T11:00:00Z").unwrap(),
                EventType::Automatic,
            )
            .unwrap(),
            CalendarEvent::new(
                "Deadline",
                DateTime::parse_from_rfc3339("2025-03-04T23:59:00Z").unwrap(),
                DateTime::parse_from_rfc3339("2025-03-04T23:59:00Z").unwrap(),
                EventType::Automatic,
            )
            .unwrap(),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let column = layout_day(&events, &[], day, &Utc, &LayoutConfig::default());
        let table = render_table(&[column]);

        assert!(table.starts_with("Tue 2025-03-04\n"));
        assert!(table.contains("Lecture  09:00 - 11:00"));
        assert!(table.contains("Deadline  ["));
    }

    #[test]
    fn empty_day_is_marked() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let column = layout_day(&[], &[], day, &Utc, &LayoutConfig::default());
        assert!(render_table(&[column]).contains("(no events)"));
    }
}
