//! Shared event/course loading for the calendar subcommands.
//!
//! Data comes either from JSON files in the backend's wire format or,
//! with `--fetch`, straight from the backend API.

use chrono::{FixedOffset, Local, NaiveDate};
use clap::Args;
use std::path::{Path, PathBuf};

use studyplan_core::calendar::{expand_all, ingest, EventRecord};
use studyplan_core::feed::ApiClient;
use studyplan_core::storage::offset_from_minutes;
use studyplan_core::{CalendarEvent, Config, Course, Timeblocker};

/// Where events and courses come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON file with an array of events
    #[arg(long)]
    pub events: Option<PathBuf>,
    /// JSON file with an array of courses
    #[arg(long)]
    pub courses: Option<PathBuf>,
    /// JSON file with an array of time-blockers
    #[arg(long)]
    pub timeblockers: Option<PathBuf>,
    /// Load everything from the backend API instead of files
    #[arg(long, conflicts_with_all = ["events", "courses", "timeblockers"])]
    pub fetch: bool,
    /// Bearer token (defaults to STUDYPLAN_API_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
    /// Display offset from UTC in minutes (defaults to config, then system)
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

/// Events and courses ready for layout.
pub struct Loaded {
    pub events: Vec<CalendarEvent>,
    pub courses: Vec<Course>,
}

impl SourceArgs {
    /// Display time zone for this invocation.
    pub fn offset(&self, config: &Config) -> Result<FixedOffset, Box<dyn std::error::Error>> {
        resolve_offset(self.utc_offset, config)
    }

    /// Load events (with time-blockers expanded over `[first, last]`) and courses.
    pub fn load(
        &self,
        config: &Config,
        first: NaiveDate,
        last: NaiveDate,
        tz: &FixedOffset,
    ) -> Result<Loaded, Box<dyn std::error::Error>> {
        let (mut events, courses, blockers) = if self.fetch {
            self.fetch_all(config)?
        } else {
            let events = match &self.events {
                Some(path) => ingest(read_json::<Vec<EventRecord>>(path)?),
                None => Vec::new(),
            };
            let courses = match &self.courses {
                Some(path) => read_json(path)?,
                None => Vec::new(),
            };
            let blockers = match &self.timeblockers {
                Some(path) => read_json(path)?,
                None => Vec::new(),
            };
            (events, courses, blockers)
        };

        events.extend(expand_all(&blockers, first, last, tz));
        tracing::debug!("loaded {} events, {} courses", events.len(), courses.len());
        Ok(Loaded { events, courses })
    }

    fn fetch_all(
        &self,
        config: &Config,
    ) -> Result<(Vec<CalendarEvent>, Vec<Course>, Vec<Timeblocker>), Box<dyn std::error::Error>> {
        let token = token_or_env(self.token.clone());
        let client = ApiClient::new(config.api.clone(), token)?;
        let runtime = runtime()?;
        Ok(runtime.block_on(async {
            tokio::join!(
                client.fetch_events(),
                client.fetch_courses(),
                client.fetch_timeblockers()
            )
        }))
    }
}

/// Display zone from a `--utc-offset` flag, else the configured one.
pub fn resolve_offset(
    flag: Option<i32>,
    config: &Config,
) -> Result<FixedOffset, Box<dyn std::error::Error>> {
    match flag {
        Some(minutes) => offset_from_minutes(minutes)
            .ok_or_else(|| format!("invalid UTC offset: {minutes} minutes").into()),
        None => Ok(config.calendar.display_offset()),
    }
}

/// Bearer token from `--token`, else `STUDYPLAN_API_TOKEN`.
pub fn token_or_env(flag: Option<String>) -> Option<String> {
    flag.or_else(ApiClient::token_from_env)
}

/// Single-threaded runtime for one-shot backend calls.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Today's date in the display zone.
pub fn today(tz: &FixedOffset) -> NaiveDate {
    Local::now().with_timezone(tz).date_naive()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("cannot parse {}: {e}", path.display()).into())
}
