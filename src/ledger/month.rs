//! Month-key arithmetic shared by every projection and grouping routine.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ExpenseError;

/// Calendar month identified by year and 1-based month, rendered as `YYYY-MM`.
///
/// Ordering is chronological and matches the lexical order of the rendered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Inverse of [`MonthKey::index`].
    pub fn from_index(index: i32) -> Self {
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// `year * 12 + month0`, so month distance is a plain subtraction.
    pub fn index(&self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }

    pub fn add_months(&self, months: i32) -> Self {
        Self::from_index(self.index() + months)
    }

    pub fn next(&self) -> Self {
        self.add_months(1)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of months from `self` through `end`, both inclusive. Zero when `end`
    /// precedes `self`.
    pub fn months_through(&self, end: MonthKey) -> u32 {
        let span = end.index() - self.index() + 1;
        span.max(0) as u32
    }

    /// Iterates `self..=end` in chronological order; empty when `end < self`.
    pub fn range_to(self, end: MonthKey) -> impl Iterator<Item = MonthKey> {
        (self.index()..=end.index()).map(MonthKey::from_index)
    }

    /// Bucket title such as `2024年02月`.
    pub fn label(&self) -> String {
        format!("{}年{:02}月", self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ExpenseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ExpenseError::InvalidRecord(format!("invalid month key `{raw}`"));
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Shorthand for [`MonthKey::of`].
pub fn month_key(date: NaiveDate) -> MonthKey {
    MonthKey::of(date)
}

/// `year * 12 + month0` for the month containing `date`.
pub fn month_index(date: NaiveDate) -> i32 {
    MonthKey::of(date).index()
}

/// First day of the month `months` after the month containing `date`.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    MonthKey::of(date).add_months(months).first_day()
}
