//! Core data models for commitplot
//!
//! A [`Dataset`] holds one [`Series`] per requested repository, in request
//! order. Each series pairs an x-axis of [`Keys`] with commit counts.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::transform::TransformError;

/// Calendar unit commits are bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Map a date onto the first day of the bucket it falls in.
    ///
    /// Weeks start on Monday (ISO 8601).
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeUnit::Day => date,
            TimeUnit::Week => {
                let back = date.weekday().num_days_from_monday() as u64;
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            TimeUnit::Month => date.with_day(1).unwrap_or(date),
            TimeUnit::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// The bucket following `bucket`, or `None` past the end of the calendar.
    pub fn next(&self, bucket: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeUnit::Day => bucket.checked_add_days(Days::new(1)),
            TimeUnit::Week => bucket.checked_add_days(Days::new(7)),
            TimeUnit::Month => bucket.checked_add_months(Months::new(1)),
            TimeUnit::Year => bucket.checked_add_months(Months::new(12)),
        }
    }

    /// Signed distance from `from` to `to` in whole units.
    pub fn offset(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        match self {
            TimeUnit::Day => (to - from).num_days(),
            TimeUnit::Week => (to - from).num_days().div_euclid(7),
            TimeUnit::Month => {
                let months = |d: NaiveDate| d.year() as i64 * 12 + d.month0() as i64;
                months(to) - months(from)
            }
            TimeUnit::Year => to.year() as i64 - from.year() as i64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeUnit::Day),
            "week" => Ok(TimeUnit::Week),
            "month" => Ok(TimeUnit::Month),
            "year" => Ok(TimeUnit::Year),
            _ => Err(TransformError::InvalidConfiguration(format!(
                "unknown time unit '{}'. Valid units: day, week, month, year",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single x value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Date(NaiveDate),
    Offset(i64),
}

impl Key {
    /// Numeric position on a continuous axis. Dates count days from 0001-01-01.
    pub fn position(&self) -> f64 {
        match self {
            Key::Date(d) => d.num_days_from_ce() as f64,
            Key::Offset(o) => *o as f64,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Key::Offset(o) => write!(f, "{}", o),
        }
    }
}

/// The x-axis of a series. Calendar dates until a shift turns them into offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum Keys {
    Dates(Vec<NaiveDate>),
    Offsets(Vec<i64>),
}

impl Keys {
    pub fn len(&self) -> usize {
        match self {
            Keys::Dates(v) => v.len(),
            Keys::Offsets(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_dates(&self) -> bool {
        matches!(self, Keys::Dates(_))
    }

    pub fn get(&self, index: usize) -> Option<Key> {
        match self {
            Keys::Dates(v) => v.get(index).copied().map(Key::Date),
            Keys::Offsets(v) => v.get(index).copied().map(Key::Offset),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

impl Default for Keys {
    fn default() -> Self {
        Keys::Dates(Vec::new())
    }
}

/// One repository's commit counts over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Series {
    /// Identifier the series was requested under
    pub label: String,
    pub x: Keys,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Keys, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Fail unless every x key has exactly one y value.
    pub fn check_shape(&self) -> Result<(), TransformError> {
        if self.x.len() != self.y.len() {
            return Err(TransformError::LengthMismatch {
                label: self.label.clone(),
                expected: self.x.len(),
                actual: self.y.len(),
            });
        }
        Ok(())
    }

    /// `(x, y)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (Key, f64)> + '_ {
        self.x.iter().zip(self.y.iter().copied())
    }
}

/// Series for a batch of identifiers, bucketed by a common time unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Dataset {
    pub unit: TimeUnit,
    pub series: Vec<Series>,
}

impl Dataset {
    pub fn new(unit: TimeUnit, series: Vec<Series>) -> Self {
        Self { unit, series }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// True while no series has been shifted onto relative offsets.
    pub fn has_date_keys(&self) -> bool {
        self.series.iter().all(|s| s.x.is_dates())
    }
}
