//! Assignments as listed by the backend.
//!
//! The client only reads them and can ask the backend scheduler to plan
//! one; the generated study sessions come back through the events feed.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::calendar::event::parse_timestamp;
use crate::calendar::Color;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub course_id: String,
    pub total_achievable_points: f64,
    /// Raw deadline string; see [`Assignment::deadline_at`].
    pub deadline: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub course_color: Option<Color>,
    #[serde(default)]
    pub course_total_points: Option<f64>,
}

impl Assignment {
    pub fn deadline_at(&self) -> Result<DateTime<FixedOffset>, ValidationError> {
        parse_timestamp("deadline", &self.deadline)
    }
}
