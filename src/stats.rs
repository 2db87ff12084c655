use serde::Serialize;

use crate::analyzers::utility::{mean, quantile_sorted, sample_stddev, sorted};
use crate::error::{DataError, Result};
use crate::record::Dataset;

/// Descriptive statistics of the value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` when there is a single record.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl SummaryStatistics {
    pub fn from_dataset(data: &Dataset) -> Result<Self> {
        let values: Vec<f64> = data.values().collect();
        Self::from_values(&values)
    }

    pub fn from_values(values: &[f64]) -> Result<Self> {
        let empty = || DataError::EmptyDataset {
            operation: "summary statistics",
        };

        let avg = mean(values).ok_or_else(empty)?;
        let ordered = sorted(values);
        let median = quantile_sorted(&ordered, 0.5).ok_or_else(empty)?;

        Ok(SummaryStatistics {
            count: values.len(),
            mean: avg,
            median,
            std_dev: sample_stddev(values, avg),
            min: ordered[0],
            max: ordered[ordered.len() - 1],
        })
    }
}

/// Summary statistics over the value column of `data`.
pub fn summary_statistics(data: &Dataset) -> Result<SummaryStatistics> {
    SummaryStatistics::from_dataset(data)
}
