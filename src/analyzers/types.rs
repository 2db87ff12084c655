//! Derived tables produced by the aggregators.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Number of records observed for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Mean value of the records that fall in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketAverage<K> {
    pub key: K,
    pub mean: f64,
    pub count: usize,
}

/// Average value per place name.
pub type RegionAverage = BucketAverage<String>;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month, for presenters that want a date axis.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Meteorological season. Declaration order is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Maps a month number (1–12) to its season: Dec–Feb is winter,
    /// Mar–May spring, Jun–Aug summer, Sep–Nov fall.
    pub fn from_month(month: u32) -> Self {
        match (month % 12 + 3) / 3 {
            1 => Season::Winter,
            2 => Season::Spring,
            3 => Season::Summer,
            _ => Season::Fall,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        f.write_str(label)
    }
}

/// A record joined with the coordinates of its place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedRecord {
    pub category: String,
    pub start_date: NaiveDate,
    pub value: f64,
    pub place_name: String,
    pub place_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Mean value at one (latitude, longitude) point of the geographic pivot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub latitude: f64,
    pub longitude: f64,
    pub mean: f64,
    pub count: usize,
}

/// One equal-width bin of a value histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Quartiles and Tukey whiskers of the value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}
