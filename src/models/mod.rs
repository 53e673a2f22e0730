// src/models/mod.rs

//! Domain models for the dashboard core.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod events;
mod job;
mod platform;

// Re-export all public types
pub use config::{Config, PathsConfig, SalaryConfig, StreamConfig};
pub use events::{
    ConnectedEvent, EVENT_CONNECTED, EVENT_LOGIN_STATUS, EVENT_PING, LoginStatusEvent,
};
pub use job::JobRecord;
pub use platform::Platform;
