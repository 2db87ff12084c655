use std::collections::BTreeMap;

use crate::analyzers::types::{BucketAverage, CategoryCount, RegionAverage};
use crate::analyzers::utility::MeanAccumulator;
use crate::record::Dataset;

/// Counts records per category, most frequent first.
///
/// Categories with equal counts keep ascending name order.
pub fn category_counts(data: &Dataset) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &data.records {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }

    let mut table: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_string(),
            count,
        })
        .collect();

    // sort_by is stable, so ties stay in name order
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// Returns the `n` most common categories.
pub fn top_categories(data: &Dataset, n: usize) -> Vec<CategoryCount> {
    if n == 0 {
        return Vec::new();
    }
    let mut table = category_counts(data);
    table.truncate(n);
    table
}

/// Averages values per place name, highest mean first.
///
/// Places with equal means keep ascending name order.
pub fn regional_average(data: &Dataset) -> Vec<RegionAverage> {
    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for record in &data.records {
        groups
            .entry(record.place_name.as_str())
            .or_default()
            .add(record.value);
    }

    let mut table: Vec<RegionAverage> = groups
        .into_iter()
        .filter_map(|(name, acc)| {
            Some(BucketAverage {
                key: name.to_string(),
                mean: acc.mean()?,
                count: acc.count(),
            })
        })
        .collect();

    table.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    table
}

/// The `n` places with the highest average value.
pub fn top_regions(data: &Dataset, n: usize) -> Vec<RegionAverage> {
    let mut table = regional_average(data);
    table.truncate(n);
    table
}

/// Truncates a long category name for display, appending `...` when cut.
pub fn shorten_label(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let head: String = name.chars().take(width).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
