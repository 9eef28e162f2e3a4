//! `studyplan config`: inspect and edit `config.toml` by dot-path key.
//!
//! Values are checked against the same ranges the loader enforces, so a
//! rejected `set` leaves the file untouched.

use clap::Subcommand;
use serde_json::Value;

use studyplan_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value (e.g. "calendar.column_height_px", "timer.work_minutes")
    Get { key: String },
    /// Change one value and save
    Set { key: String, value: String },
    /// Print every key as `key = value`
    List,
    /// Print where the config file lives
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            tracing::info!("config {key} updated");
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in flatten(&serde_json::to_value(&config)?) {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Leaf values of a config tree, keyed by the dot path `get`/`set` accept.
fn flatten(value: &Value) -> Vec<(String, String)> {
    fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    walk(&path, child, out);
                }
            }
            Value::String(s) => out.push((prefix.to_string(), s.clone())),
            other => out.push((prefix.to_string(), other.to_string())),
        }
    }

    let mut out = Vec::new();
    walk("", value, &mut out);
    out
}
