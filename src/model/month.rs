use anyhow::{bail, Context};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::Res;

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Month {
    // Field order matters for the derived `Ord`.
    year: i32,
    month: u32,
}

impl Month {
    /// Returns `None` if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the month.
    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The following month.
    pub fn next(&self) -> Self {
        Self::of(self.start() + Months::new(1))
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .with_context(|| format!("'{s}' is not a month, expected YYYY-MM"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("'{s}' has an invalid year"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("'{s}' has an invalid month"))?;
        match Month::new(year, month) {
            Some(m) => Ok(m),
            None => bail!("'{s}' has a month outside of 1-12"),
        }
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Month::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// The date formats tried, in order, when no others are configured.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Date-time formats whose time part is dropped.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses `Order_Date` strings using an ordered list of `chrono` format strings. The first format
/// that matches wins.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DateParser {
    formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().copied())
    }
}

impl DateParser {
    pub fn new<S, I>(formats: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub(crate) fn parse(&self, s: &str) -> Res<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            bail!("An empty string is not a date");
        }
        for format in &self.formats {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date);
            }
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(date_time) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(date_time.date());
            }
        }
        bail!(
            "'{s}' does not match any of the date formats {:?}",
            self.formats
        )
    }
}
