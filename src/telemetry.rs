//! Telemetry record posted to the collection server.

use crate::error::ControllerError;
use serde::Serialize;

/// Raw ADC count read from a bone-dry probe.
pub const MOISTURE_RAW_MIN: i32 = 1200;
/// Raw ADC count read from a saturated probe.
pub const MOISTURE_RAW_MAX: i32 = 4000;
/// Upper end of the moisture scale. The probe is calibrated past 100%.
pub const MOISTURE_SCALE_MAX: i32 = 150;

/// One reading as posted by the node.
///
/// Field names are the server's JSON keys. The raw light channels are only
/// sent when set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    /// UTC time of the reading, `YYYY-MM-DDTHH:MM:SSZ`.
    pub timestamp: String,
    /// Air temperature in °F.
    pub temp_f: f32,
    /// Relative humidity in %.
    pub humidity: f32,
    /// Illuminance from the exposure controller.
    pub lux: f32,
    /// Soil moisture on the 0-150 scale.
    pub moisture: f32,
    /// Raw ambient light channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_als: Option<f32>,
    /// Raw white channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_white: Option<f32>,
}

impl SensorReading {
    /// Encode as a compact JSON object.
    pub fn to_json(&self) -> Result<String, ControllerError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Convert °C to °F.
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Map a raw moisture ADC count onto the 0-150 scale.
///
/// Linear between the calibration points with integer truncation, then clamped.
pub fn moisture_percent(raw: i32) -> i32 {
    let span = i64::from(MOISTURE_RAW_MAX - MOISTURE_RAW_MIN);
    let scaled =
        (i64::from(raw) - i64::from(MOISTURE_RAW_MIN)) * i64::from(MOISTURE_SCALE_MAX) / span;
    scaled.clamp(0, i64::from(MOISTURE_SCALE_MAX)) as i32
}
