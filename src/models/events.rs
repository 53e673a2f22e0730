//! Typed payloads for the login-status event stream.
//!
//! The stream client hands listeners raw event data; these types are the
//! payload schemas the backend emits. Parsing the JSON is the listener's
//! job, so decode failures stay local to one event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Platform;
use crate::error::Result;

/// Event name for the once-per-connection status snapshot.
pub const EVENT_CONNECTED: &str = "connected";

/// Event name for login-status change notifications.
pub const EVENT_LOGIN_STATUS: &str = "login-status";

/// Event name for heartbeats. Carries no useful payload.
pub const EVENT_PING: &str = "ping";

/// Login-status snapshot sent once per established connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedEvent {
    /// Login state per platform at connect time.
    #[serde(default)]
    pub statuses: BTreeMap<Platform, bool>,
}

impl ConnectedEvent {
    /// Parse a `connected` event payload.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

/// A single platform login-status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatusEvent {
    pub platform: Platform,
    pub is_logged_in: bool,
}

impl LoginStatusEvent {
    /// Parse a `login-status` event payload.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_status_wire_format() {
        let event =
            LoginStatusEvent::from_json(r#"{"platform":"boss","isLoggedIn":true}"#).unwrap();
        assert_eq!(event.platform, Platform::Boss);
        assert!(event.is_logged_in);
    }

    #[test]
    fn test_login_status_rejects_unknown_platform() {
        assert!(LoginStatusEvent::from_json(r#"{"platform":"monster","isLoggedIn":true}"#).is_err());
    }

    #[test]
    fn test_connected_snapshot() {
        let event = ConnectedEvent::from_json(
            r#"{"statuses":{"boss":true,"job51":false,"liepin":false,"zhilian":true}}"#,
        )
        .unwrap();
        assert_eq!(event.statuses.len(), 4);
        assert_eq!(event.statuses[&Platform::Boss], true);
        assert_eq!(event.statuses[&Platform::Job51], false);
    }

    #[test]
    fn test_connected_missing_statuses_defaults_empty() {
        let event = ConnectedEvent::from_json("{}").unwrap();
        assert!(event.statuses.is_empty());
    }
}
