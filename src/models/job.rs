//! Job listing records collected by the scraper backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Platform;

/// A scraped job listing.
///
/// The backend owns collection and persistence; this crate only reads
/// snapshots of these records for analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Platform the listing was scraped from
    pub platform: Platform,

    /// Job title
    pub title: String,

    /// Company name
    pub company: String,

    /// City or district
    #[serde(default)]
    pub city: String,

    /// Raw salary text as published (e.g. "15-25K·13薪", "面议")
    #[serde(default)]
    pub salary: String,

    /// Full URL to the listing
    #[serde(default)]
    pub link: String,

    /// When the listing was scraped
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}
