use chrono::{Datelike, FixedOffset, NaiveDate};
use clap::Args;
use serde::Serialize;

use studyplan_core::calendar::range::days_in_month;
use studyplan_core::calendar::{events_on, month_grid};
use studyplan_core::{CalendarEvent, Config};

use super::input::{today, SourceArgs};

#[derive(Args, Debug)]
pub struct MonthArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    #[arg(long)]
    pub month: Option<u32>,
    /// Print JSON instead of a grid
    #[arg(long)]
    pub json: bool,
}

/// One grid cell; `date` is `None` for the blanks before the 1st.
#[derive(Debug, Serialize)]
pub struct MonthCell<'a> {
    pub date: Option<NaiveDate>,
    pub events: Vec<&'a CalendarEvent>,
}

pub fn run(args: MonthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tz = args.source.offset(&config)?;
    let now = today(&tz);
    let year = args.year.unwrap_or_else(|| now.year());
    let month = args.month.unwrap_or_else(|| now.month());

    let grid = month_grid(year, month)?;
    let (first, last) = match (
        NaiveDate::from_ymd_opt(year, month, 1),
        days_in_month(year, month).and_then(|n| NaiveDate::from_ymd_opt(year, month, n)),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(format!("invalid month: {year}-{month}").into()),
    };
    let loaded = args.source.load(&config, first, last, &tz)?;
    let cells = build_cells(&grid, &loaded.events, &tz);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cells)?);
    } else {
        print!("{}", render_grid(year, month, &cells, &tz));
    }
    Ok(())
}

pub fn build_cells<'a>(
    grid: &[Option<NaiveDate>],
    events: &'a [CalendarEvent],
    tz: &FixedOffset,
) -> Vec<MonthCell<'a>> {
    grid.iter()
        .map(|date| MonthCell {
            date: *date,
            events: date.map(|d| events_on(d, events, tz)).unwrap_or_default(),
        })
        .collect()
}

/// Sunday-first grid; a `*` marks days with events, followed by a per-day listing.
pub fn render_grid(year: i32, month: u32, cells: &[MonthCell], tz: &FixedOffset) -> String {
    let mut out = format!("{year}-{month:02}\n Su  Mo  Tu  We  Th  Fr  Sa\n");
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell.date {
                Some(d) if cell.events.is_empty() => format!("{:>3} ", d.day()),
                Some(d) => format!("{:>3}*", d.day()),
                None => "    ".to_string(),
            })
            .collect();
        out.push_str(row.concat().trim_end());
        out.push('\n');
    }

    for cell in cells {
        let Some(date) = cell.date else { continue };
        if cell.events.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", date.format("%a %d")));
        for event in &cell.events {
            out.push_str(&format!(
                "  {} {}\n",
                event.start_time.with_timezone(tz).format("%H:%M"),
                event.name
            ));
        }
    }
    out
}
