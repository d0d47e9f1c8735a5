use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which way passengers travel relative to the reporting country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Arrivals,
    Departures,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Arrivals => "arrivals",
            Direction::Departures => "departures",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown direction '{0}', expected 'arrivals' or 'departures'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrivals" | "arrival" => Ok(Direction::Arrivals),
            "departures" | "departure" => Ok(Direction::Departures),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct ParseMonthError(pub String);

/// A calendar month, written `YYYY-MM` in the dataset.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ParseMonthError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(ParseMonthError(format!("{year}-{month}")))
        }
    }

    /// Column header used on the slope chart axis, e.g. `08/2019`.
    pub fn axis_label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }

    /// Long form used in summaries, e.g. `August 2019`.
    pub fn long_label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(d) => d.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseMonthError(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(bad());
        }
        let year = y.parse::<i32>().map_err(|_| bad())?;
        let month = m.parse::<u32>().map_err(|_| bad())?;
        YearMonth::new(year, month).map_err(|_| bad())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One observation: passengers for one country, one month, one direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub date: YearMonth,
    pub name: String,
    pub code: String,
    /// `None` when the source marks the month as not available.
    pub value: Option<f64>,
    pub direction: Direction,
}

/// All loaded records, arrivals and departures together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for a single month (the map view).
    pub fn filter(&self, direction: Direction, date: YearMonth) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.direction == direction && r.date == date)
            .collect()
    }

    /// Records for either of two months, in dataset order (the slope view).
    pub fn filter_pair(
        &self,
        direction: Direction,
        left: YearMonth,
        right: YearMonth,
    ) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.direction == direction && (r.date == left || r.date == right))
            .collect()
    }

    /// Distinct months present, oldest first.
    pub fn dates(&self) -> Vec<YearMonth> {
        let set: BTreeSet<YearMonth> = self.records.iter().map(|r| r.date).collect();
        set.into_iter().collect()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let years = self.records.iter().map(|r| r.date.year);
        let min = years.clone().min()?;
        let max = years.max()?;
        Some((min, max))
    }
}
