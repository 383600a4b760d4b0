//! Descriptive statistics over a sequence of measurements.

use serde::Serialize;

/// Summary statistics of a dataset.
///
/// An empty dataset produces the all-zero value rather than an error, so
/// check [`Statistics::is_empty`] before dividing by anything derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    /// Arithmetic mean.
    pub avg: f64,
    pub median: f64,
    /// Population standard deviation (divisor `count`).
    pub std_dev: f64,
}

impl Statistics {
    /// Computes statistics from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use teripang_core::stats::Statistics;
    /// let stats = Statistics::compute([4.0, 1.0, 3.0, 2.0]);
    /// assert_eq!(stats.count, 4);
    /// assert_eq!(stats.median, 2.5);
    /// assert_eq!(stats.avg, 2.5);
    /// ```
    pub fn compute(values: impl IntoIterator<Item = f64>) -> Self {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics of one field selected from each record.
    pub fn of<T>(records: &[T], field: impl Fn(&T) -> f64) -> Self {
        Self::compute(records.iter().map(field))
    }

    /// Computes statistics from values already sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        debug_assert!(
            sorted_values.windows(2).all(|w| w[0] <= w[1]),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self::default();
        };
        let count = sorted_values.len();
        let n = count as f64;
        let avg = sorted_values.iter().sum::<f64>() / n;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted_values[mid - 1] + sorted_values[mid]) / 2.0
        } else {
            sorted_values[mid]
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - avg).powi(2))
            .sum::<f64>()
            / n;

        Self {
            count,
            min,
            max,
            avg,
            median,
            std_dev: variance.sqrt(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
