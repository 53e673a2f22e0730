//! Job platform identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A job platform covered by the automation backend.
///
/// The serialized form matches the wire keys used in stream payloads and
/// job snapshots ("boss", "job51", "liepin", "zhilian").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Boss直聘
    Boss,
    /// 前程无忧 (51job)
    Job51,
    /// 猎聘
    Liepin,
    /// 智联招聘
    Zhilian,
}

impl Platform {
    /// All supported platforms, in display order.
    pub const ALL: [Platform; 4] = [
        Platform::Boss,
        Platform::Job51,
        Platform::Liepin,
        Platform::Zhilian,
    ];

    /// Stable wire key for this platform.
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Boss => "boss",
            Platform::Job51 => "job51",
            Platform::Liepin => "liepin",
            Platform::Zhilian => "zhilian",
        }
    }

    /// Human-readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Boss => "Boss直聘",
            Platform::Job51 => "前程无忧",
            Platform::Liepin => "猎聘",
            Platform::Zhilian => "智联招聘",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boss" => Ok(Platform::Boss),
            "job51" => Ok(Platform::Job51),
            "liepin" => Ok(Platform::Liepin),
            "zhilian" => Ok(Platform::Zhilian),
            other => Err(AppError::validation(format!(
                "Unknown platform key: {other}"
            ))),
        }
    }
}
