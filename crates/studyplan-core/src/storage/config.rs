//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Calendar column assumptions used by the block geometry
//! - Block and highlight alpha levels
//! - Display time zone and default window mode
//! - Backend API location and endpoint paths
//!
//! Configuration is stored at `~/.config/studyplan/config.toml`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::{GeometryConfig, LayoutConfig};
use crate::error::ConfigError;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "STUDYPLAN_API_URL";

/// Offset of `minutes` east of UTC, if it is a valid offset (under 24h).
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

/// Calendar rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_column_height_px")]
    pub column_height_px: f64,
    #[serde(default = "default_label_threshold_percent")]
    pub label_threshold_percent: f64,
    #[serde(default = "default_block_alpha")]
    pub block_alpha: f32,
    #[serde(default = "default_focus_alpha")]
    pub focus_alpha: f32,
    #[serde(default = "default_highlight_secs")]
    pub highlight_secs: u32,
    #[serde(default)]
    pub two_day: bool,
    /// Display offset from UTC; the system offset when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_events_path")]
    pub events_path: String,
    #[serde(default = "default_courses_path")]
    pub courses_path: String,
    #[serde(default = "default_timeblockers_path")]
    pub timeblockers_path: String,
    #[serde(default = "default_assignments_path")]
    pub assignments_path: String,
    /// Prefix of the schedule-generation endpoint; the assignment id is appended.
    #[serde(default = "default_scheduler_path")]
    pub scheduler_path: String,
}

/// Pomodoro phase lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyplan/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

// Default functions
fn default_column_height_px() -> f64 {
    960.0
}
fn default_label_threshold_percent() -> f64 {
    6.0
}
fn default_block_alpha() -> f32 {
    0.35
}
fn default_focus_alpha() -> f32 {
    0.85
}
fn default_highlight_secs() -> u32 {
    2
}
fn default_base_url() -> String {
    "http://localhost:8080".into()
}
fn default_events_path() -> String {
    "/api/events/my".into()
}
fn default_courses_path() -> String {
    "/api/courses/my".into()
}
fn default_timeblockers_path() -> String {
    "/api/timeblockers/my".into()
}
fn default_assignments_path() -> String {
    "/api/assignments/my".into()
}
fn default_scheduler_path() -> String {
    "/api/scheduler/generate".into()
}
fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            column_height_px: default_column_height_px(),
            label_threshold_percent: default_label_threshold_percent(),
            block_alpha: default_block_alpha(),
            focus_alpha: default_focus_alpha(),
            highlight_secs: default_highlight_secs(),
            two_day: false,
            utc_offset_minutes: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            events_path: default_events_path(),
            courses_path: default_courses_path(),
            timeblockers_path: default_timeblockers_path(),
            assignments_path: default_assignments_path(),
            scheduler_path: default_scheduler_path(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl CalendarConfig {
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            geometry: GeometryConfig {
                column_height_px: self.column_height_px,
                label_threshold_percent: self.label_threshold_percent,
            },
            block_alpha: self.block_alpha,
            focus_alpha: self.focus_alpha,
        }
    }

    pub fn highlight_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.highlight_secs))
    }

    /// Configured display offset, falling back to the system's current one.
    pub fn display_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(offset_from_minutes)
            .unwrap_or_else(|| *chrono::Local::now().offset())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: format!("calendar.{key}"),
            message,
        };

        if !(self.column_height_px.is_finite() && self.column_height_px > 0.0) {
            return Err(invalid(
                "column_height_px",
                format!("must be a positive number of pixels, got {}", self.column_height_px),
            ));
        }
        if !(self.label_threshold_percent.is_finite() && self.label_threshold_percent >= 0.0) {
            return Err(invalid(
                "label_threshold_percent",
                format!("must be a non-negative percentage, got {}", self.label_threshold_percent),
            ));
        }
        for (key, alpha) in [("block_alpha", self.block_alpha), ("focus_alpha", self.focus_alpha)] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid(key, format!("must be within [0, 1], got {alpha}")));
            }
        }
        if let Some(minutes) = self.utc_offset_minutes {
            if offset_from_minutes(minutes).is_none() {
                return Err(invalid(
                    "utc_offset_minutes",
                    format!("{minutes} minutes is not a valid UTC offset"),
                ));
            }
        }
        Ok(())
    }
}

impl TimerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, minutes) in [("work_minutes", self.work_minutes), ("break_minutes", self.break_minutes)] {
            if minutes == 0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("timer.{key}"),
                    message: "must be at least one minute".into(),
                });
            }
        }
        Ok(())
    }
}

impl ApiConfig {
    /// Base URL, with `STUDYPLAN_API_URL` taking precedence.
    pub fn effective_base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone())
    }
}

impl Config {
    /// Check value ranges that the types alone do not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.validate()?;
        self.timer.validate()
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn parse_scalar(value: &str) -> serde_json::Value {
        if let Ok(b) = value.parse::<bool>() {
            return serde_json::Value::Bool(b);
        }
        if let Ok(n) = value.parse::<i64>() {
            return serde_json::Value::Number(n.into());
        }
        if let Some(n) = value.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return serde_json::Value::Number(n);
        }
        serde_json::Value::String(value.into())
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;

                let new_value = match obj.get(part) {
                    Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    Some(serde_json::Value::Number(_)) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    Some(serde_json::Value::String(_)) => serde_json::Value::String(value.into()),
                    Some(_) => serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?,
                    // Optional keys are absent while unset.
                    None => Self::parse_scalar(value),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config path.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the key's type.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;

        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        // Keys serde ignored on the way back in were not real keys.
        if updated.get(key).is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist to the default path.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.calendar.column_height_px, 960.0);
        assert_eq!(parsed.api.courses_path, "/api/courses/my");
        assert_eq!(parsed.calendar.utc_offset_minutes, None);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(indoc::indoc! {r#"
            [calendar]
            two_day = true
            utc_offset_minutes = 60
        "#})
        .unwrap();
        assert!(parsed.calendar.two_day);
        assert_eq!(parsed.calendar.label_threshold_percent, 6.0);
        assert_eq!(parsed.api.base_url, "http://localhost:8080");
        assert_eq!(
            parsed.calendar.display_offset(),
            FixedOffset::east_opt(3600).unwrap()
        );
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.two_day").as_deref(), Some("false"));
        assert_eq!(cfg.get("calendar.highlight_secs").as_deref(), Some("2"));
        assert_eq!(cfg.get("api.events_path").as_deref(), Some("/api/events/my"));
        assert!(cfg.get("calendar.missing_key").is_none());
    }

    #[test]
    fn update_changes_nested_values() {
        let mut cfg = Config::default();
        cfg.update("calendar.two_day", "true").unwrap();
        cfg.update("calendar.column_height_px", "1200").unwrap();
        cfg.update("calendar.block_alpha", "0.5").unwrap();
        cfg.update("api.base_url", "https://api.example.org").unwrap();
        assert!(cfg.calendar.two_day);
        assert_eq!(cfg.calendar.column_height_px, 1200.0);
        assert_eq!(cfg.calendar.block_alpha, 0.5);
        assert_eq!(cfg.api.base_url, "https://api.example.org");
    }

    #[test]
    fn update_sets_optional_offset() {
        let mut cfg = Config::default();
        cfg.update("calendar.utc_offset_minutes", "-300").unwrap();
        assert_eq!(cfg.calendar.utc_offset_minutes, Some(-300));
    }

    #[test]
    fn update_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("calendar.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.update("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn update_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.update("calendar.two_day", "not_a_bool").is_err());
        assert!(cfg.update("calendar.highlight_secs", "soon").is_err());
        assert!(!cfg.calendar.two_day);
    }

    #[test]
    fn layout_config_reflects_calendar_section() {
        let mut cfg = Config::default();
        cfg.calendar.column_height_px = 480.0;
        let layout = cfg.calendar.layout();
        assert!((layout.geometry.min_height_percent() - 2.0 / 480.0 * 100.0).abs() < 1e-12);
        assert_eq!(layout.block_alpha, 0.35);
        assert_eq!(cfg.calendar.highlight_duration(), chrono::Duration::seconds(2));
    }

    #[test]
    fn load_from_creates_default_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert!(!created.calendar.two_day);

        let mut cfg = created;
        cfg.update("calendar.two_day", "true").unwrap();
        cfg.save_to(&path).unwrap();
        assert!(Config::load_from(&path).unwrap().calendar.two_day);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "calendar = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn out_of_range_offset_is_rejected_not_overflowed() {
        assert_eq!(offset_from_minutes(i32::MAX), None);
        assert_eq!(offset_from_minutes(24 * 60), None);
        assert_eq!(offset_from_minutes(-300), FixedOffset::west_opt(5 * 3600));

        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("calendar.utc_offset_minutes", "40000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.calendar.utc_offset_minutes, None);
    }

    #[test]
    fn display_offset_falls_back_for_invalid_stored_offset() {
        let mut calendar = CalendarConfig::default();
        calendar.utc_offset_minutes = Some(40_000_000);
        assert_eq!(calendar.display_offset(), *chrono::Local::now().offset());
    }

    #[test]
    fn column_height_must_be_positive() {
        let mut cfg = Config::default();
        for bad in ["0", "-120", "0.0"] {
            assert!(
                matches!(
                    cfg.update("calendar.column_height_px", bad),
                    Err(ConfigError::InvalidValue { .. })
                ),
                "accepted column height {bad}"
            );
        }
        assert_eq!(cfg.calendar.column_height_px, 960.0);
        assert!(cfg.calendar.layout().geometry.min_height_percent() > 0.0);
    }

    #[test]
    fn alphas_must_stay_in_unit_range() {
        let mut cfg = Config::default();
        assert!(cfg.update("calendar.block_alpha", "1.5").is_err());
        assert!(cfg.update("calendar.focus_alpha", "-0.1").is_err());
        cfg.update("calendar.focus_alpha", "1").unwrap();
        assert_eq!(cfg.calendar.focus_alpha, 1.0);
    }

    #[test]
    fn timer_phases_must_be_nonzero() {
        let mut cfg = Config::default();
        assert_eq!(cfg.timer.work_minutes, 25);
        assert!(cfg.update("timer.break_minutes", "0").is_err());
        cfg.update("timer.work_minutes", "50").unwrap();
        assert_eq!(cfg.timer.work_minutes, 50);
    }

    #[test]
    fn load_from_rejects_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            indoc::indoc! {r#"
                [calendar]
                column_height_px = 0.0
            "#},
        )
        .unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
