//! Cleaned measurement rows and the in-memory dataset that holds them.

use chrono::NaiveDate;
use serde::Serialize;

/// Header of the free-text column that cleaning removes.
pub const COL_MESSAGE: &str = "Message";
pub const COL_PLACE_ID: &str = "Geo Join ID";
pub const COL_PLACE_NAME: &str = "Geo Place Name";
pub const COL_CATEGORY: &str = "Name";
pub const COL_START_DATE: &str = "Start_Date";
pub const COL_VALUE: &str = "Data Value";

/// Columns that must be present in every source file.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_MESSAGE,
    COL_PLACE_ID,
    COL_PLACE_NAME,
    COL_CATEGORY,
    COL_START_DATE,
    COL_VALUE,
];

/// One cleaned measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub category: String,
    pub start_date: NaiveDate,
    pub value: f64,
    pub place_name: String,
    pub place_id: String,
    /// Values of the pass-through columns, in [`Dataset::extra_columns`] order.
    #[serde(skip)]
    pub extra: Vec<String>,
}

impl Record {
    pub fn new(category: &str, start_date: NaiveDate, value: f64, place_name: &str, place_id: &str) -> Self {
        Self {
            category: category.to_string(),
            start_date,
            value,
            place_name: place_name.to_string(),
            place_id: place_id.to_string(),
            extra: Vec::new(),
        }
    }
}

/// A fully loaded, cleaned dataset.
///
/// Aggregators only ever borrow it, so a single instance can be shared freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub extra_columns: Vec<String>,
    /// Rows removed because the place id or place name was empty.
    pub dropped_rows: usize,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.value)
    }

    /// Returns the pass-through value of `column` for `record`, if that column exists.
    pub fn extra_value<'a>(&self, record: &'a Record, column: &str) -> Option<&'a str> {
        let idx = self.extra_columns.iter().position(|c| c == column)?;
        record.extra.get(idx).map(String::as_str)
    }
}
