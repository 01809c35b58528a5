//! Calendar periods
//!
//! `CalendarView` maps a planning date to the millisecond window of time
//! slots to display. `DateRange` holds the dashboard presets, resolved
//! against a given "today".

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp;

/// Planning calendar granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Day,
    Week,
    Month,
}

impl CalendarView {
    /// Number of days covered by the window
    ///
    /// Month is a fixed 30 days, not the calendar month.
    pub fn window_days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Inclusive `[start, end]` window starting at UTC midnight of `date`
    pub fn range(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = timestamp::start_of_day(date);
        let end = start + Duration::days(self.window_days()) - Duration::milliseconds(1);
        (start, end)
    }

    /// Date one unit after `date`
    pub fn next(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date + Duration::days(1),
            Self::Week => date + Duration::days(7),
            Self::Month => date.checked_add_months(Months::new(1)).unwrap_or(date),
        }
    }

    /// Date one unit before `date`
    pub fn prev(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date - Duration::days(1),
            Self::Week => date - Duration::days(7),
            Self::Month => date.checked_sub_months(Months::new(1)).unwrap_or(date),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" => Some(Self::Day),
            "week" | "w" => Some(Self::Week),
            "month" | "m" => Some(Self::Month),
            _ => None,
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "Day"),
            Self::Week => write!(f, "Week"),
            Self::Month => write!(f, "Month"),
        }
    }
}

/// Dashboard reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    ThisWeek,
    #[default]
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl DateRange {
    /// Inclusive `(first, last)` days of the window relative to `today`
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Today => (today, today),
            Self::ThisWeek => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (monday, today)
            }
            Self::ThisMonth => (today.with_day(1).unwrap_or(today), today),
            Self::LastMonth => {
                let first_this_month = today.with_day(1).unwrap_or(today);
                let last_prev = first_this_month - Duration::days(1);
                (last_prev.with_day(1).unwrap_or(last_prev), last_prev)
            }
            Self::ThisYear => (today.with_ordinal(1).unwrap_or(today), today),
        }
    }

    pub fn contains(&self, today: NaiveDate, day: NaiveDate) -> bool {
        let (start, end) = self.bounds(today);
        day >= start && day <= end
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "today" => Some(Self::Today),
            "this_week" | "week" => Some(Self::ThisWeek),
            "this_month" | "month" => Some(Self::ThisMonth),
            "last_month" => Some(Self::LastMonth),
            "this_year" | "year" => Some(Self::ThisYear),
            _ => None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "Today"),
            Self::ThisWeek => write!(f, "This week"),
            Self::ThisMonth => write!(f, "This month"),
            Self::LastMonth => write!(f, "Last month"),
            Self::ThisYear => write!(f, "This year"),
        }
    }
}
