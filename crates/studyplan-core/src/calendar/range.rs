//! Week and month date ranges.
//!
//! Weeks start on Sunday. The visible window is owned by the caller and
//! passed into the layout functions; navigation returns a new window.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How many days the calendar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    #[default]
    Week,
    /// Today's weekday and the next index of the displayed week.
    TwoDay,
}

/// Navigation direction for week paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Set of calendar days currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleWindow {
    /// Any date inside the displayed week.
    pub reference: NaiveDate,
    /// Date used to pick the two-day slice.
    pub today: NaiveDate,
    pub mode: WindowMode,
}

impl VisibleWindow {
    pub fn week(reference: NaiveDate) -> Self {
        Self {
            reference,
            today: reference,
            mode: WindowMode::Week,
        }
    }

    pub fn two_day(reference: NaiveDate, today: NaiveDate) -> Self {
        Self {
            reference,
            today,
            mode: WindowMode::TwoDay,
        }
    }

    /// Ordered visible dates: 7 in week mode, 2 in two-day mode.
    pub fn days(&self) -> Vec<NaiveDate> {
        let week = week_dates(self.reference);
        match self.mode {
            WindowMode::Week => week.to_vec(),
            WindowMode::TwoDay => {
                let today = weekday_index(self.today);
                vec![week[today], week[(today + 1) % 7]]
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days().contains(&date)
    }

    /// Page one week back or forward.
    pub fn navigate(&self, direction: Direction) -> Self {
        let offset = match direction {
            Direction::Prev => -7,
            Direction::Next => 7,
        };
        Self {
            reference: self.reference + Duration::days(offset),
            ..self.clone()
        }
    }

    /// Page `weeks` weeks at once (negative goes back); `None` when the
    /// target falls outside the representable date range.
    pub fn navigate_by(&self, weeks: i64) -> Option<Self> {
        let reference = self
            .reference
            .checked_add_signed(Duration::try_weeks(weeks)?)?;
        Some(Self {
            reference,
            ..self.clone()
        })
    }

    /// Same mode, re-anchored so that `date` is shown. In two-day mode
    /// the slice starts at `date`.
    pub fn jump_to(&self, date: NaiveDate) -> Self {
        let today = match self.mode {
            WindowMode::Week => self.today,
            WindowMode::TwoDay => date,
        };
        Self {
            reference: date,
            today,
            mode: self.mode,
        }
    }
}

/// Weekday index with Sunday = 0.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(weekday_index(date) as i64)
}

/// The seven dates of the Sunday-start week containing `date`.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(date);
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Month cells for a Sunday-start grid: leading blanks, then every day.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<Option<NaiveDate>>, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ValidationError::InvalidValue {
            field: "month".into(),
            message: format!("{year}-{month} is not a calendar month"),
        }
    })?;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; weekday_index(first)];
    cells.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(Some),
    );
    Ok(cells)
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(chrono::Months::new(1))?;
    Some((next - first).num_days() as u32)
}
