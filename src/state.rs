//! Controller state snapshot.

use crate::zone::Zone;

/// A snapshot of the exposure controller's current state.
///
/// Use [`ExposureController::state`](crate::ExposureController::state) to obtain a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// The zone whose settings are loaded into the sensor.
    pub zone: Zone,
    /// The last lux value recorded by the controller.
    pub lux: f32,
    /// Gain multiplier read back from the sensor.
    pub gain: f32,
    /// Integration time read back from the sensor, in milliseconds.
    pub integration_time_ms: u16,
}

/// Outcome of one [`update_cycle`](crate::ExposureController::update_cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneUpdate {
    /// The averaged reading stayed in the current zone; the sensor was not touched.
    Unchanged,
    /// The sensor was reconfigured for a new zone.
    Changed {
        /// Zone before the cycle.
        from: Zone,
        /// Zone now loaded.
        to: Zone,
    },
}

impl ZoneUpdate {
    /// Whether the sensor was reconfigured.
    pub fn is_changed(&self) -> bool {
        matches!(self, ZoneUpdate::Changed { .. })
    }
}
