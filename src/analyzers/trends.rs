//! Time-bucketed averages of the value column.
//!
//! Buckets are derived from each record's start date on the fly; the dataset
//! itself is never modified.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::analyzers::types::{BucketAverage, MonthBucket, Season};
use crate::analyzers::utility::MeanAccumulator;
use crate::record::{Dataset, Record};

/// Groups records by `key` and averages each group, in ascending key order.
pub fn bucket_average<K, F>(data: &Dataset, key: F) -> Vec<BucketAverage<K>>
where
    K: Ord,
    F: Fn(&Record) -> K,
{
    let mut buckets: BTreeMap<K, MeanAccumulator> = BTreeMap::new();
    for record in &data.records {
        buckets.entry(key(record)).or_default().add(record.value);
    }

    buckets
        .into_iter()
        .filter_map(|(key, acc)| {
            Some(BucketAverage {
                key,
                mean: acc.mean()?,
                count: acc.count(),
            })
        })
        .collect()
}

/// Average value per calendar month, chronologically.
pub fn monthly_average(data: &Dataset) -> Vec<BucketAverage<MonthBucket>> {
    bucket_average(data, |r| MonthBucket::of(r.start_date))
}

/// Average value per year, chronologically.
pub fn yearly_average(data: &Dataset) -> Vec<BucketAverage<i32>> {
    bucket_average(data, |r| r.start_date.year())
}

/// Average value per season, in Winter, Spring, Summer, Fall order.
///
/// Seasons with no records are omitted.
pub fn seasonal_average(data: &Dataset) -> Vec<BucketAverage<Season>> {
    bucket_average(data, |r| Season::from_month(r.start_date.month()))
}
