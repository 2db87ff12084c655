//! Output formatting and persistence for derived tables.
//!
//! Supports pretty-printing, JSON serialization, and writing a CSV file.

use std::fmt::Debug;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

/// Logs a derived table using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug + ?Sized>(table: &T) {
    info!("{:#?}", table);
}

/// Logs a derived table as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(table: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(table)?);
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
///
/// The header row is derived from the field names of `T`.
pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
