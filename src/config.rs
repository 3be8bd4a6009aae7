//! Node configuration and remote-config apply rules.

use crate::error::ControllerError;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;

/// Sleep interval used until a configuration is loaded.
pub const DEFAULT_SLEEP_SEC: u32 = 300;
/// Shortest accepted sleep interval.
pub const MIN_SLEEP_SEC: u32 = 1;
/// Longest accepted sleep interval.
pub const MAX_SLEEP_SEC: u32 = 6000;
/// Timeout budget for WiFi association and HTTP requests.
pub const CONNECT_TIMEOUT_MS: u32 = 10_000;

/// Settings that persist across wakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// Deep-sleep interval in seconds.
    pub sleep_sec: u32,
    /// Version of the last applied remote configuration.
    pub config_version: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            sleep_sec: DEFAULT_SLEEP_SEC,
            config_version: 0,
        }
    }
}

/// Fields extracted from a remote configuration document.
///
/// Fields that are missing or not unsigned 32-bit integers are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Sleep interval in seconds.
    pub sleep: Option<u32>,
    /// Server-side config version.
    pub config_version: Option<u32>,
}

impl RemoteConfig {
    /// Parse a configuration document.
    ///
    /// The fields may sit at the top level or inside a `"data"` object.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Json`] if `json` is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self, ControllerError> {
        let doc: Value = serde_json::from_str(json)?;
        let payload = match doc.get("data") {
            Some(data) if !data.is_null() => data,
            _ => &doc,
        };
        debug!("config payload: {}", payload);

        Ok(Self {
            sleep: get_u32(payload, "sleep"),
            config_version: get_u32(payload, "config_version"),
        })
    }
}

fn get_u32(payload: &Value, key: &str) -> Option<u32> {
    payload
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

impl NodeConfig {
    /// Apply a remote configuration.
    ///
    /// Returns `true` if the sleep interval changed or the remote version is
    /// newer. A change that would leave the version at 0 sets it to
    /// `config_version + 1` instead, wrapping like the firmware's counter.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidSleepInterval`] if the requested interval
    /// is outside 1-6000 seconds. The config is left unchanged.
    pub fn apply(&mut self, remote: &RemoteConfig) -> Result<bool, ControllerError> {
        let new_sec = remote.sleep.unwrap_or(self.sleep_sec);
        if !(MIN_SLEEP_SEC..=MAX_SLEEP_SEC).contains(&new_sec) {
            warn!(
                "invalid sleep={}s (expected {}-{}s), keeping {}s",
                new_sec, MIN_SLEEP_SEC, MAX_SLEEP_SEC, self.sleep_sec
            );
            return Err(ControllerError::InvalidSleepInterval {
                value: new_sec,
                min: MIN_SLEEP_SEC,
                max: MAX_SLEEP_SEC,
            });
        }

        let new_ver = remote.config_version.unwrap_or(self.config_version);
        debug!(
            "parsed sleep={}, version={} (current sleep={}, version={})",
            new_sec, new_ver, self.sleep_sec, self.config_version
        );

        if new_sec == self.sleep_sec && new_ver <= self.config_version {
            debug!(
                "config unchanged (version={}, sleep={}s)",
                self.config_version, self.sleep_sec
            );
            return Ok(false);
        }

        self.sleep_sec = new_sec;
        self.config_version = if new_ver != 0 {
            new_ver
        } else {
            self.config_version.wrapping_add(1)
        };
        info!(
            "sleep set to {}s (version={})",
            self.sleep_sec, self.config_version
        );
        Ok(true)
    }

    /// The sleep interval as a [`Duration`].
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.sleep_sec))
    }

    /// The sleep interval in milliseconds.
    pub fn sleep_ms(&self) -> u64 {
        u64::from(self.sleep_sec) * 1000
    }
}
