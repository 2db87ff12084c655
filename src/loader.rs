//! Loads an air-quality CSV file into a cleaned [`Dataset`].
//!
//! Cleaning drops the free-text `Message` column, removes rows without a place
//! id or place name, and parses `Start_Date` with a fixed format. Any column
//! not used by the aggregators is carried through untouched.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::record::{
    COL_CATEGORY, COL_PLACE_ID, COL_PLACE_NAME, COL_START_DATE, COL_VALUE, Dataset,
    REQUIRED_COLUMNS, Record,
};

pub const DEFAULT_SOURCE: &str = "Air_Quality.csv";
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Where to read the dataset from and how to interpret its dates.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub source: PathBuf,
    pub date_format: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl LoadOptions {
    pub fn with_source(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}

/// Column positions resolved once from the header row.
struct Schema {
    place_id: usize,
    place_name: usize,
    category: usize,
    start_date: usize,
    value: usize,
    /// (position, name) of every column that is neither required nor dropped.
    extra: Vec<(usize, String)>,
}

impl Schema {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataError::SchemaMismatch {
                    column: name.to_string(),
                })
        };

        // Report the first missing column in a stable order.
        for column in REQUIRED_COLUMNS {
            position(column)?;
        }

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.trim()))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        Ok(Self {
            place_id: position(COL_PLACE_ID)?,
            place_name: position(COL_PLACE_NAME)?,
            category: position(COL_CATEGORY)?,
            start_date: position(COL_START_DATE)?,
            value: position(COL_VALUE)?,
            extra,
        })
    }
}

/// Reads and cleans the dataset at `options.source`.
///
/// # Errors
///
/// Returns [`DataError::SourceNotFound`] if the file does not exist, and any
/// error [`read_dataset`] can produce.
#[tracing::instrument(skip(options), fields(source = %options.source.display()))]
pub fn load_dataset(options: &LoadOptions) -> Result<Dataset> {
    let file = File::open(&options.source).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataError::SourceNotFound {
            path: options.source.clone(),
        },
        _ => DataError::Io(e),
    })?;

    let data = read_dataset(file, &options.date_format)?;
    info!(
        records = data.len(),
        dropped = data.dropped_rows,
        "Dataset loaded"
    );
    Ok(data)
}

/// Reads and cleans CSV data from any reader.
///
/// Rows missing a place id or place name are skipped and counted in
/// [`Dataset::dropped_rows`]. Any other bad row fails the whole load.
pub fn read_dataset<R: Read>(reader: R, date_format: &str) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let schema = Schema::from_headers(&headers)?;
    debug!(columns = headers.len(), extra = schema.extra.len(), "Header validated");

    let mut records = Vec::new();
    let mut dropped_rows = 0;

    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        let row_number = i + 1;

        let field = |idx: usize| row.get(idx).unwrap_or("").trim();

        let place_id = field(schema.place_id);
        let place_name = field(schema.place_name);
        if place_id.is_empty() || place_name.is_empty() {
            dropped_rows += 1;
            continue;
        }

        let raw_date = field(schema.start_date);
        let start_date = NaiveDate::parse_from_str(raw_date, date_format).map_err(|_| {
            DataError::InvalidDate {
                row: row_number,
                value: raw_date.to_string(),
            }
        })?;

        let raw_value = field(schema.value);
        // f64::from_str accepts "NaN" and "inf"; neither is a measurement.
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataError::InvalidValue {
                row: row_number,
                value: raw_value.to_string(),
            })?;

        records.push(Record {
            category: field(schema.category).to_string(),
            start_date,
            value,
            place_name: place_name.to_string(),
            place_id: place_id.to_string(),
            extra: schema
                .extra
                .iter()
                .map(|(idx, _)| row.get(*idx).unwrap_or("").to_string())
                .collect(),
        });
    }

    if dropped_rows > 0 {
        warn!(dropped_rows, "Dropped rows without a place id or place name");
    }

    Ok(Dataset {
        records,
        extra_columns: schema.extra.into_iter().map(|(_, name)| name).collect(),
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Unique ID,Indicator ID,Name,Measure,Measure Info,Geo Type Name,Geo Join ID,Geo Place Name,Time Period,Start_Date,Data Value,Message";

    fn csv(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s
    }

    #[test]
    fn test_read_valid_rows() {
        let input = csv(&[
            "172653,375,Nitrogen dioxide (NO2),Mean,ppb,UHF34,203,Bedford Stuyvesant - Crown Heights,Annual Average 2011,12/01/2010,25.3,",
            "172585,375,Nitrogen dioxide (NO2),Mean,ppb,UHF34,203,Bedford Stuyvesant - Crown Heights,Annual Average 2009,12/01/2008,26.93,",
        ]);
        let data = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.dropped_rows, 0);
        let first = &data.records[0];
        assert_eq!(first.category, "Nitrogen dioxide (NO2)");
        assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2010, 12, 1).unwrap());
        assert_eq!(first.value, 25.3);
        assert_eq!(first.place_id, "203");
    }

    #[test]
    fn test_message_column_is_dropped_and_extras_kept() {
        let input = csv(&["1,375,NO2,Mean,ppb,UHF34,203,Harlem,Annual,12/01/2010,25.3,note"]);
        let data = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap();

        assert!(!data.extra_columns.iter().any(|c| c == "Message"));
        assert_eq!(
            data.extra_columns,
            vec!["Unique ID", "Indicator ID", "Measure", "Measure Info", "Geo Type Name", "Time Period"]
        );
        assert_eq!(data.extra_value(&data.records[0], "Measure Info"), Some("ppb"));
        assert!(!data.records[0].extra.iter().any(|v| v == "note"));
    }

    #[test]
    fn test_rows_missing_place_are_dropped() {
        let input = csv(&[
            "1,375,NO2,Mean,ppb,UHF34,,Harlem,Annual,12/01/2010,25.3,",
            "2,375,NO2,Mean,ppb,UHF34,203,,Annual,12/01/2010,25.3,",
            "3,375,NO2,Mean,ppb,UHF34,203,Harlem,Annual,12/01/2010,25.3,",
        ]);
        let data = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(data.dropped_rows, 2);
    }

    #[test]
    fn test_dropped_row_with_bad_date_does_not_fail() {
        let input = csv(&["1,375,NO2,Mean,ppb,UHF34,,Harlem,Annual,not a date,25.3,"]);
        let data = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap();

        assert!(data.is_empty());
        assert_eq!(data.dropped_rows, 1);
    }

    #[test]
    fn test_missing_message_column() {
        let input = "Name,Geo Join ID,Geo Place Name,Start_Date,Data Value\nNO2,1,Harlem,12/01/2010,3.0";
        let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

        match err {
            DataError::SchemaMismatch { column } => assert_eq!(column, "Message"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_value_column() {
        let input = "Name,Geo Join ID,Geo Place Name,Start_Date,Message\nNO2,1,Harlem,12/01/2010,";
        let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

        assert!(matches!(err, DataError::SchemaMismatch { column } if column == "Data Value"));
    }

    #[test]
    fn test_bad_date_fails_whole_load() {
        let input = csv(&[
            "1,375,NO2,Mean,ppb,UHF34,203,Harlem,Annual,12/01/2010,25.3,",
            "2,375,NO2,Mean,ppb,UHF34,203,Harlem,Annual,2010-13-45,25.3,",
        ]);
        let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

        assert!(matches!(err, DataError::InvalidDate { row: 2, .. }));
    }

    #[test]
    fn test_bad_value_fails_whole_load() {
        let input = csv(&["1,375,NO2,Mean,ppb,UHF34,203,Harlem,Annual,12/01/2010,n/a,"]);
        let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

        assert!(matches!(err, DataError::InvalidValue { row: 1, ref value } if value == "n/a"));
    }

    #[test]
    fn test_nan_value_fails_load() {
        let input = csv(&[
            "1,375,NO2,Mean,ppb,UHF34,203,Rockaways,Annual,12/01/2010,10,",
            "2,375,NO2,Mean,ppb,UHF34,204,Harlem,Annual,12/01/2010,NaN,",
        ]);
        let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

        assert!(matches!(err, DataError::InvalidValue { row: 2, ref value } if value == "NaN"));
    }

    #[test]
    fn test_infinite_value_fails_load() {
        for raw in ["inf", "-inf", "infinity"] {
            let row = format!("1,375,NO2,Mean,ppb,UHF34,205,Chelsea,Annual,12/01/2010,{raw},");
            let input = csv(&[row.as_str()]);
            let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

            assert!(matches!(err, DataError::InvalidValue { row: 1, .. }), "{raw} was accepted");
        }
    }

    #[test]
    fn test_custom_date_format() {
        let input = csv(&["1,375,NO2,Mean,ppb,UHF34,203,Harlem,Annual,2023-02-01,20,"]);
        let data = read_dataset(input.as_bytes(), "%Y-%m-%d").unwrap();

        assert_eq!(data.records[0].start_date, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let input = csv(&["1,375,NO2"]);
        let err = read_dataset(input.as_bytes(), DEFAULT_DATE_FORMAT).unwrap_err();

        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_load_missing_source() {
        let options = LoadOptions::with_source("/nonexistent/air_quality_missing.csv");
        let err = load_dataset(&options).unwrap_err();

        assert!(matches!(err, DataError::SourceNotFound { .. }));
    }

    #[test]
    fn test_default_options() {
        let options = LoadOptions::default();
        assert_eq!(options.source, PathBuf::from("Air_Quality.csv"));
        assert_eq!(options.date_format, "%m/%d/%Y");
    }
}
