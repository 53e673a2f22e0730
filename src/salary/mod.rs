// src/salary/mod.rs

//! Salary text parsing and histogram bucketing.
//!
//! Job boards publish salaries as free text ("15-25K", "1.5-2.5万",
//! "25K以上", "15-20K·13薪", "面议"). This module normalizes them into a
//! monthly range in thousands and assigns the representative value to a
//! fixed histogram bucket.

mod bucket;
mod parse;

pub use bucket::{SalaryBucket, bucket_index, default_buckets};
pub use parse::{SalaryParser, SalaryRange};
