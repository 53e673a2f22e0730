// src/stats.rs

//! KPI aggregation over collected job records.
//!
//! Computes the headline figures the dashboard renders: record counts,
//! the average representative salary, and the bucket histogram. Records
//! whose salary text does not parse are skipped, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::JobRecord;
use crate::salary::{SalaryBucket, SalaryParser, bucket_index};

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub label: String,
    pub count: usize,
}

/// Headline figures for the analytics screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Total records in the snapshot
    pub total: usize,

    /// Records with a parseable salary
    pub with_salary: usize,

    /// Mean of the representative values, absent when nothing parsed
    pub average_median_k: Option<f64>,

    /// Per-bucket counts, in bucket order
    pub histogram: Vec<BucketCount>,

    /// When the summary was computed
    pub generated_at: DateTime<Utc>,
}

/// Aggregate a record snapshot into a KPI summary.
pub fn summarize(
    records: &[JobRecord],
    parser: &SalaryParser,
    buckets: &[SalaryBucket],
) -> KpiSummary {
    let mut counts = vec![0usize; buckets.len()];
    let mut sum = 0.0;
    let mut parsed = 0usize;

    for record in records {
        let Some(range) = parser.parse(&record.salary) else {
            continue;
        };
        parsed += 1;
        sum += range.median_k;
        if let Some(index) = bucket_index(buckets, range.median_k) {
            counts[index] += 1;
        }
    }

    KpiSummary {
        total: records.len(),
        with_salary: parsed,
        average_median_k: (parsed > 0).then(|| sum / parsed as f64),
        histogram: buckets
            .iter()
            .zip(counts)
            .map(|(bucket, count)| BucketCount {
                label: bucket.label.clone(),
                count,
            })
            .collect(),
        generated_at: Utc::now(),
    }
}

/// Keep records whose parsed salary interval overlaps `[min_k, max_k]`.
///
/// Records without a parseable salary never match a range filter.
pub fn filter_by_salary<'a>(
    records: &'a [JobRecord],
    parser: &SalaryParser,
    min_k: Option<f64>,
    max_k: Option<f64>,
) -> Vec<&'a JobRecord> {
    records
        .iter()
        .filter(|record| match parser.parse(&record.salary) {
            Some(range) => {
                min_k.is_none_or(|min| range.high_k >= min)
                    && max_k.is_none_or(|max| range.low_k <= max)
            }
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;
    use crate::salary::default_buckets;

    fn record(salary: &str) -> JobRecord {
        JobRecord {
            platform: Platform::Boss,
            title: "后端工程师".to_string(),
            company: "示例公司".to_string(),
            city: "北京".to_string(),
            salary: salary.to_string(),
            link: String::new(),
            scraped_at: None,
        }
    }

    fn bar(summary: &KpiSummary, label: &str) -> usize {
        summary
            .histogram
            .iter()
            .find(|bucket| bucket.label == label)
            .unwrap()
            .count
    }

    #[test]
    fn test_summarize_counts_and_average() {
        let records = vec![
            record("10-20K"),  // median 15
            record("20-30K"),  // median 25
            record("面议"),    // skipped
            record("25K以上"), // median 25
        ];
        let summary = summarize(&records, &SalaryParser::default(), &default_buckets());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.with_salary, 3);
        let average = summary.average_median_k.unwrap();
        assert!((average - (15.0 + 25.0 + 25.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_histogram_placement() {
        let records = vec![
            record("5K"),     // 0-10K
            record("10-20K"), // median 15 -> 15-20K
            record("20-30K"), // median 25 -> >=25K
            record("30-50K"), // median 40 -> >=25K
        ];
        let summary = summarize(&records, &SalaryParser::default(), &default_buckets());

        assert_eq!(bar(&summary, "0-10K"), 1);
        assert_eq!(bar(&summary, "10-15K"), 0);
        assert_eq!(bar(&summary, "15-20K"), 1);
        assert_eq!(bar(&summary, "≥25K"), 2);
    }

    #[test]
    fn test_summarize_empty_snapshot() {
        let summary = summarize(&[], &SalaryParser::default(), &default_buckets());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.with_salary, 0);
        assert!(summary.average_median_k.is_none());
        assert!(summary.histogram.iter().all(|bucket| bucket.count == 0));
    }

    #[test]
    fn test_filter_keeps_overlapping_ranges() {
        let records = vec![
            record("5-8K"),
            record("10-20K"),
            record("30-40K"),
            record("面议"),
        ];
        let parser = SalaryParser::default();

        let filtered = filter_by_salary(&records, &parser, Some(15.0), Some(25.0));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].salary, "10-20K");
    }

    #[test]
    fn test_filter_with_only_lower_bound() {
        let records = vec![record("5-8K"), record("10-20K"), record("30-40K")];
        let parser = SalaryParser::default();

        let filtered = filter_by_salary(&records, &parser, Some(20.0), None);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_without_bounds_keeps_parseable_only() {
        let records = vec![record("10-20K"), record("面议")];
        let parser = SalaryParser::default();

        let filtered = filter_by_salary(&records, &parser, None, None);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_summary_serializes_for_dashboard() {
        let summary = summarize(
            &[record("15-25K")],
            &SalaryParser::default(),
            &default_buckets(),
        );
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"with_salary\":1"));
        assert!(json.contains("\"label\":\"20-25K\""));
    }
}
