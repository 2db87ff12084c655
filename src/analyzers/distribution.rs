//! Shape of the value distribution: histogram and box-plot summary.

use crate::analyzers::types::{BoxPlot, HistogramBin};
use crate::analyzers::utility::{quantile_sorted, sorted};
use crate::error::{DataError, Result};
use crate::record::Dataset;

/// Equal-width histogram of values over `[min, max]`.
///
/// Every bin is half-open except the last, which also holds `max`. When all
/// values are equal the range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(data: &Dataset, bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(DataError::InvalidArgument(
            "histogram needs at least one bin".to_string(),
        ));
    }
    let values: Vec<f64> = data.values().collect();
    if values.is_empty() {
        return Err(DataError::EmptyDataset {
            operation: "histogram",
        });
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect())
}

/// Quartiles, 1.5×IQR whiskers and outlier count of the value column.
pub fn box_plot(data: &Dataset) -> Result<BoxPlot> {
    let values = sorted(&data.values().collect::<Vec<_>>());
    let empty = || DataError::EmptyDataset {
        operation: "box plot",
    };

    let q1 = quantile_sorted(&values, 0.25).ok_or_else(empty)?;
    let median = quantile_sorted(&values, 0.5).ok_or_else(empty)?;
    let q3 = quantile_sorted(&values, 0.75).ok_or_else(empty)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();

    Ok(BoxPlot {
        q1,
        median,
        q3,
        iqr,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers: values.len() - inside.len(),
    })
}
