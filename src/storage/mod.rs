// src/storage/mod.rs

//! Snapshot storage for job records and KPI summaries.

mod local;

pub use local::LocalStorage;
