//! Histogram buckets over the representative salary value.

use serde::{Deserialize, Serialize};

/// A labeled half-open salary interval `[low_k, high_k)` in thousands.
///
/// The final bucket of a list leaves `high_k` unset and is unbounded
/// above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBucket {
    pub label: String,
    pub low_k: f64,
    pub high_k: Option<f64>,
}

impl SalaryBucket {
    fn bounded(label: &str, low_k: f64, high_k: f64) -> Self {
        Self {
            label: label.to_string(),
            low_k,
            high_k: Some(high_k),
        }
    }

    fn unbounded(label: &str, low_k: f64) -> Self {
        Self {
            label: label.to_string(),
            low_k,
            high_k: None,
        }
    }

    /// Whether `value` falls inside this bucket.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low_k && self.high_k.is_none_or(|high| value < high)
    }
}

/// The fixed bucket list rendered by the dashboard histogram.
pub fn default_buckets() -> Vec<SalaryBucket> {
    vec![
        SalaryBucket::bounded("0-10K", 0.0, 10.0),
        SalaryBucket::bounded("10-15K", 10.0, 15.0),
        SalaryBucket::bounded("15-20K", 15.0, 20.0),
        SalaryBucket::bounded("20-25K", 20.0, 25.0),
        SalaryBucket::unbounded("≥25K", 25.0),
    ]
}

/// Index of the bucket holding `median_k`, if any.
///
/// Non-positive and non-finite values are excluded rather than clamped,
/// as are values below the first bucket's lower bound.
pub fn bucket_index(buckets: &[SalaryBucket], median_k: f64) -> Option<usize> {
    if !median_k.is_finite() || median_k <= 0.0 {
        return None;
    }
    buckets.iter().position(|bucket| bucket.contains(median_k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_value_goes_to_upper_bucket() {
        let buckets = default_buckets();
        let index = bucket_index(&buckets, 10.0).unwrap();
        assert_eq!(buckets[index].label, "10-15K");
    }

    #[test]
    fn test_large_value_lands_in_unbounded_bucket() {
        let buckets = default_buckets();
        let index = bucket_index(&buckets, 30.0).unwrap();
        assert_eq!(buckets[index].label, "≥25K");
    }

    #[test]
    fn test_just_below_boundary() {
        let buckets = default_buckets();
        let index = bucket_index(&buckets, 9.99).unwrap();
        assert_eq!(buckets[index].label, "0-10K");

        let index = bucket_index(&buckets, 24.99).unwrap();
        assert_eq!(buckets[index].label, "20-25K");
    }

    #[test]
    fn test_exactly_twenty_five_is_unbounded_bucket() {
        let buckets = default_buckets();
        let index = bucket_index(&buckets, 25.0).unwrap();
        assert_eq!(buckets[index].label, "≥25K");
    }

    #[test]
    fn test_non_positive_values_are_excluded() {
        let buckets = default_buckets();
        assert!(bucket_index(&buckets, 0.0).is_none());
        assert!(bucket_index(&buckets, -5.0).is_none());
        assert!(bucket_index(&buckets, f64::NAN).is_none());
    }

    #[test]
    fn test_value_below_first_bucket_is_excluded() {
        let buckets = vec![SalaryBucket::bounded("5-10K", 5.0, 10.0)];
        assert!(bucket_index(&buckets, 3.0).is_none());
    }
}
