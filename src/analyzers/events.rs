use serde::Serialize;
use tracing::debug;

use crate::analyzers::utility::mean;
use crate::error::{DataError, Result};
use crate::record::Dataset;

/// Records whose value strictly exceeds `threshold`, in their original order.
pub fn high_pollution_events(data: &Dataset, threshold: f64) -> Dataset {
    let records: Vec<_> = data
        .records
        .iter()
        .filter(|r| r.value > threshold)
        .cloned()
        .collect();
    debug!(threshold, matched = records.len(), total = data.len(), "Filtered high pollution events");

    Dataset {
        records,
        extra_columns: data.extra_columns.clone(),
        dropped_rows: 0,
    }
}

/// Before/after means of a policy comparison and their difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyImpact {
    pub before_mean: f64,
    pub after_mean: f64,
    /// `after_mean - before_mean`
    pub delta: f64,
    pub before_records: usize,
    pub after_records: usize,
}

impl PolicyImpact {
    /// # Errors
    ///
    /// Returns [`DataError::EmptyDataset`] if either side has no records.
    pub fn compare(before: &Dataset, after: &Dataset) -> Result<Self> {
        let before_values: Vec<f64> = before.values().collect();
        let after_values: Vec<f64> = after.values().collect();

        let empty = || DataError::EmptyDataset {
            operation: "policy impact",
        };
        let before_mean = mean(&before_values).ok_or_else(empty)?;
        let after_mean = mean(&after_values).ok_or_else(empty)?;

        Ok(PolicyImpact {
            before_mean,
            after_mean,
            delta: after_mean - before_mean,
            before_records: before_values.len(),
            after_records: after_values.len(),
        })
    }
}

/// Change in mean value after a policy: `mean(after) - mean(before)`.
///
/// # Errors
///
/// Returns [`DataError::EmptyDataset`] if either side has no records.
pub fn policy_impact(before: &Dataset, after: &Dataset) -> Result<f64> {
    Ok(PolicyImpact::compare(before, after)?.delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use chrono::NaiveDate;

    fn dataset(values: &[f64]) -> Dataset {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        Dataset::from_records(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Record::new("NO2", date, *v, "Harlem", &i.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_events_strictly_above_threshold() {
        let data = dataset(&[5.0, 30.0, 20.0, 45.5, 20.0001]);

        let events = high_pollution_events(&data, 20.0);
        let values: Vec<f64> = events.values().collect();
        assert_eq!(values, vec![30.0, 45.5, 20.0001]);
    }

    #[test]
    fn test_events_fixed_point() {
        let data = dataset(&[1.0, 50.0, 12.0, 80.0]);

        let once = high_pollution_events(&data, 10.0);
        let twice = high_pollution_events(&once, 10.0);
        assert_eq!(once.records, twice.records);
        assert!(twice.records.iter().all(|r| r.value > 10.0));
    }

    #[test]
    fn test_events_keep_extra_columns() {
        let mut data = dataset(&[100.0]);
        data.extra_columns = vec!["Measure".to_string()];
        data.records[0].extra = vec!["Mean".to_string()];

        let events = high_pollution_events(&data, 1.0);
        assert_eq!(events.extra_value(&events.records[0], "Measure"), Some("Mean"));
    }

    #[test]
    fn test_policy_impact() {
        let before = dataset(&[20.0, 30.0]);
        let after = dataset(&[15.0, 17.0, 19.0]);

        assert_eq!(policy_impact(&before, &after).unwrap(), -8.0);
    }

    #[test]
    fn test_policy_impact_compare_reports_both_sides() {
        let before = dataset(&[20.0, 30.0]);
        let after = dataset(&[15.0, 17.0, 19.0]);

        let impact = PolicyImpact::compare(&before, &after).unwrap();
        assert_eq!(impact.before_mean, 25.0);
        assert_eq!(impact.after_mean, 17.0);
        assert_eq!(impact.delta, -8.0);
        assert_eq!(impact.before_records, 2);
        assert_eq!(impact.after_records, 3);
    }

    #[test]
    fn test_policy_impact_empty_side() {
        let data = dataset(&[1.0]);
        let empty = Dataset::default();

        assert!(matches!(
            policy_impact(&empty, &data),
            Err(DataError::EmptyDataset { .. })
        ));
        assert!(matches!(
            policy_impact(&data, &empty),
            Err(DataError::EmptyDataset { .. })
        ));
    }
}
