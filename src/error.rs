//! Error types for the exposure controller and sensor-node glue.

/// Errors that can occur when configuring the controller or handling node data.
///
/// The exposure cycle itself ([`initialize`](crate::ExposureController::initialize)
/// and [`update_cycle`](crate::ExposureController::update_cycle)) never fails;
/// these errors come from manual overrides, remote configuration and telemetry.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// A raw zone index did not name one of the four zones.
    #[error("Invalid zone index {0} (expected 0-3)")]
    InvalidZone(u8),

    /// A sleep interval was outside the accepted range.
    #[error("Invalid sleep interval {value}s (expected {min}-{max}s)")]
    InvalidSleepInterval {
        /// The rejected interval in seconds.
        value: u32,
        /// Minimum allowed value.
        min: u32,
        /// Maximum allowed value.
        max: u32,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
