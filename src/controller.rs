//! Adaptive exposure controller.

use crate::error::ControllerError;
use crate::retained::RetainedState;
use crate::sensor::LightSensor;
use crate::state::{ControllerState, ZoneUpdate};
use crate::zone::Zone;

use embedded_hal::delay::DelayNs;
use log::{debug, info, trace, warn};
use std::sync::Arc;

/// Number of raw lux reads averaged per classification.
pub const SAMPLE_COUNT: u8 = 3;

/// Spacing between averaged reads, in milliseconds.
pub const SAMPLE_SPACING_MS: u32 = 5;

/// Keeps a light sensor's gain and integration time matched to ambient brightness.
///
/// Each cycle averages a few lux reads, classifies the average into a [`Zone`]
/// and reconfigures the sensor only when the zone changes. Every
/// reconfiguration costs one integration time of settling plus a discarded
/// read, so unchanged cycles never touch the hardware.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use luxzone_core::{ExposureController, MockDelay, MockLightSensor, RetainedState, Zone};
///
/// let sensor = MockLightSensor::with_lux(50.0);
/// let mut controller = ExposureController::new(sensor, MockDelay::new(), Arc::new(RetainedState::new()));
///
/// assert_eq!(controller.initialize(), Zone::VeryDim);
/// assert_eq!(controller.integration_time_ms(), 400);
/// ```
///
/// # Concurrency
///
/// The controller owns its sensor and is meant to be driven by a single
/// sampling task. All waits block the calling thread.
pub struct ExposureController<S, D> {
    sensor: S,
    delay: D,
    retained: Arc<RetainedState>,
    current_zone: Zone,
    last_lux: f32,
}

impl<S: LightSensor, D: DelayNs> ExposureController<S, D> {
    /// Create a controller around a sensor, a delay provider and the retained mirror.
    ///
    /// The sensor is not touched until [`initialize`](Self::initialize) runs.
    pub fn new(sensor: S, delay: D, retained: Arc<RetainedState>) -> Self {
        Self {
            sensor,
            delay,
            retained,
            current_zone: Zone::VeryBright,
            last_lux: 0.0,
        }
    }

    /// Pick and load the zone for the current light level.
    ///
    /// Call once per wake, before the first [`update_cycle`](Self::update_cycle).
    /// The profile is applied unconditionally, so the sensor is consistent with
    /// [`zone`](Self::zone) afterwards regardless of what it held before.
    pub fn initialize(&mut self) -> Zone {
        let lux = self.average_lux();
        let target = Zone::classify(lux);

        self.apply_zone(target, true);
        self.current_zone = target;
        self.retained.record_zone(target);
        self.last_lux = self.sensor.read_lux();

        info!(
            "boot zone={:?}, gain={:.3}, it={}ms, lux={:.1}",
            self.current_zone,
            self.gain(),
            self.integration_time_ms(),
            self.last_lux
        );
        target
    }

    /// Run one sampling cycle.
    ///
    /// Returns [`ZoneUpdate::Changed`] when the averaged reading fell into a
    /// different zone and the sensor was reconfigured. In that case
    /// [`lux`](Self::lux) holds a fresh post-settling read; otherwise it holds
    /// the average.
    pub fn update_cycle(&mut self) -> ZoneUpdate {
        let lux = self.average_lux();
        let target = Zone::classify(lux);

        if target == self.current_zone {
            self.last_lux = lux;
            debug!("lux={:.1} zone={:?} (unchanged)", lux, self.current_zone);
            return ZoneUpdate::Unchanged;
        }

        let from = self.current_zone;
        self.apply_zone(target, false);
        self.current_zone = target;
        self.retained.record_zone(target);
        info!("zone {:?} -> {:?} at {:.1} lux", from, target, lux);

        self.last_lux = self.sensor.read_lux();
        debug!("lux={:.1} zone={:?}", self.last_lux, self.current_zone);

        ZoneUpdate::Changed { from, to: target }
    }

    /// Force the sensor into `zone`.
    ///
    /// Always reconfigures, even when `zone` is already current. The retained
    /// mirror and [`lux`](Self::lux) are left alone.
    pub fn set_zone(&mut self, zone: Zone) {
        self.apply_zone(zone, true);
        self.current_zone = zone;
    }

    /// Force the sensor into the zone with raw index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidZone`] if `index` is not 0-3. The
    /// sensor is not touched in that case.
    pub fn set_zone_raw(&mut self, index: u8) -> Result<(), ControllerError> {
        let zone = Zone::try_from(index)?;
        self.set_zone(zone);
        Ok(())
    }

    /// The last lux value recorded by [`initialize`](Self::initialize) or
    /// [`update_cycle`](Self::update_cycle).
    pub fn lux(&self) -> f32 {
        self.last_lux
    }

    /// The zone whose settings are loaded into the sensor.
    pub fn zone(&self) -> Zone {
        self.current_zone
    }

    /// Gain multiplier as reported by the sensor.
    pub fn gain(&self) -> f32 {
        self.sensor.gain_value()
    }

    /// Integration time as reported by the sensor, in milliseconds.
    pub fn integration_time_ms(&self) -> u16 {
        self.sensor.integration_time_ms()
    }

    /// Read the raw ambient light channel.
    pub fn als(&mut self) -> f32 {
        self.sensor.read_als()
    }

    /// Read the raw white channel.
    pub fn white(&mut self) -> f32 {
        self.sensor.read_white()
    }

    /// Get a snapshot of the current controller state.
    pub fn state(&self) -> ControllerState {
        ControllerState {
            zone: self.current_zone,
            lux: self.last_lux,
            gain: self.gain(),
            integration_time_ms: self.integration_time_ms(),
        }
    }

    /// The retained mirror this controller writes to.
    pub fn retained(&self) -> &RetainedState {
        &self.retained
    }

    /// Borrow the underlying sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Mutably borrow the underlying sensor.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Give back the sensor and delay provider.
    pub fn release(self) -> (S, D) {
        (self.sensor, self.delay)
    }

    fn apply_zone(&mut self, zone: Zone, force: bool) {
        if !force && zone == self.current_zone {
            return;
        }

        let profile = zone.profile();
        self.sensor.set_gain(profile.gain);
        self.sensor.set_integration_time(profile.integration_time);
        self.delay
            .delay_ms(u32::from(profile.integration_time.as_millis()));
        let _ = self.sensor.read_lux();

        debug!(
            "apply {:?} -> {:?} gain={:.3} it={}ms{}",
            self.current_zone,
            zone,
            self.sensor.gain_value(),
            self.sensor.integration_time_ms(),
            if force { " (forced)" } else { "" }
        );
    }

    fn average_lux(&mut self) -> f32 {
        let mut sum = 0.0;
        for _ in 0..SAMPLE_COUNT {
            let lux = self.sensor.read_lux();
            trace!("sample lux={:.1}", lux);
            sum += lux;
            self.delay.delay_ms(SAMPLE_SPACING_MS);
        }
        let avg = sum / f32::from(SAMPLE_COUNT);
        if avg.is_nan() || avg < 0.0 {
            warn!("implausible lux average {}, treating as darkness", avg);
        }
        avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockLightSensor, SensorCall};
    use crate::zone::{Gain, IntegrationTime};

    fn controller(sensor: MockLightSensor) -> ExposureController<MockLightSensor, MockDelay> {
        ExposureController::new(sensor, MockDelay::new(), Arc::new(RetainedState::new()))
    }

    /// Build a controller booted at `lux` with the call log cleared.
    fn settled_in(lux: f32) -> ExposureController<MockLightSensor, MockDelay> {
        let mut ctrl = controller(MockLightSensor::with_lux(lux));
        ctrl.initialize();
        ctrl.sensor_mut().clear_calls();
        ctrl
    }

    #[test]
    fn test_cold_boot_in_darkness() {
        let mut ctrl = controller(MockLightSensor::with_lux(50.0));

        assert_eq!(ctrl.initialize(), Zone::VeryDim);
        assert_eq!(ctrl.zone(), Zone::VeryDim);
        assert_eq!(ctrl.gain(), 2.0);
        assert_eq!(ctrl.integration_time_ms(), 400);
        assert_eq!(ctrl.lux(), 50.0);
        assert_eq!(ctrl.retained().zone(), Some(Zone::VeryDim));
    }

    #[test]
    fn test_initialize_forces_apply_on_default_zone() {
        // The in-memory default is VeryBright; booting in bright light must
        // still load the settings.
        let mut ctrl = controller(MockLightSensor::with_lux(40_000.0));

        assert_eq!(ctrl.initialize(), Zone::VeryBright);
        assert_eq!(ctrl.sensor().apply_count(), 1);
        assert_eq!(ctrl.sensor().gain(), Some(Gain::X1_8));
        assert_eq!(ctrl.sensor().integration_time(), Some(IntegrationTime::Ms25));
    }

    #[test]
    fn test_initialize_call_sequence() {
        let mut ctrl = controller(MockLightSensor::with_lux(2_000.0));
        ctrl.initialize();

        assert_eq!(
            ctrl.sensor().calls(),
            &[
                SensorCall::ReadLux,
                SensorCall::ReadLux,
                SensorCall::ReadLux,
                SensorCall::SetGain(Gain::X1),
                SensorCall::SetIntegrationTime(IntegrationTime::Ms200),
                SensorCall::ReadLux,
                SensorCall::ReadLux,
            ]
        );
        let (_, delay) = ctrl.release();
        assert_eq!(delay.delays_ms(), &[5, 5, 5, 200]);
    }

    #[test]
    fn test_sudden_bright_flash() {
        let mut ctrl = settled_in(2_000.0);
        assert_eq!(ctrl.zone(), Zone::Dim);

        ctrl.sensor_mut().push_lux(&[30_000.0, 30_000.0, 30_000.0, 29_000.0, 31_000.0]);
        let update = ctrl.update_cycle();

        assert_eq!(
            update,
            ZoneUpdate::Changed {
                from: Zone::Dim,
                to: Zone::VeryBright
            }
        );
        assert_eq!(ctrl.zone(), Zone::VeryBright);
        assert_eq!(ctrl.gain(), 0.125);
        assert_eq!(ctrl.integration_time_ms(), 25);
        // 29_000 is the discarded settling read.
        assert_eq!(ctrl.lux(), 31_000.0);
    }

    #[test]
    fn test_stable_mid_range() {
        let mut ctrl = settled_in(8_000.0);
        assert_eq!(ctrl.zone(), Zone::Bright);

        ctrl.sensor_mut().push_lux(&[8_100.0, 8_200.0, 8_300.0]);
        let update = ctrl.update_cycle();

        assert_eq!(update, ZoneUpdate::Unchanged);
        assert_eq!(ctrl.zone(), Zone::Bright);
        assert_eq!(ctrl.sensor().apply_count(), 0);
        assert!((ctrl.lux() - 8_200.0).abs() < 0.01);
    }

    #[test]
    fn test_unchanged_cycles_never_reconfigure() {
        let mut ctrl = settled_in(3_000.0);

        for _ in 0..5 {
            assert_eq!(ctrl.update_cycle(), ZoneUpdate::Unchanged);
        }
        assert_eq!(ctrl.sensor().apply_count(), 0);
        assert_eq!(ctrl.zone(), Zone::Dim);
    }

    #[test]
    fn test_transition_discards_exactly_one_read() {
        let mut ctrl = settled_in(100.0);

        ctrl.sensor_mut().push_lux(&[6_000.0, 6_000.0, 6_000.0, 1.0, 6_500.0]);
        assert!(ctrl.update_cycle().is_changed());

        let reads_after_apply = ctrl
            .sensor()
            .calls()
            .iter()
            .skip_while(|c| !matches!(c, SensorCall::SetIntegrationTime(_)))
            .filter(|c| matches!(c, SensorCall::ReadLux))
            .count();
        assert_eq!(reads_after_apply, 2);
        assert_eq!(ctrl.lux(), 6_500.0);
    }

    #[test]
    fn test_transition_waits_for_new_integration_time() {
        let mut ctrl = settled_in(30_000.0);

        ctrl.sensor_mut().set_fallback_lux(10.0);
        ctrl.update_cycle();

        let (_, delay) = ctrl.release();
        // boot: 3 samples + 25ms settle; cycle: 3 samples + 400ms settle
        assert_eq!(delay.delays_ms(), &[5, 5, 5, 25, 5, 5, 5, 400]);
    }

    #[test]
    fn test_forced_override_same_zone() {
        let mut ctrl = settled_in(2_000.0);

        ctrl.set_zone(Zone::Dim);
        assert_eq!(ctrl.sensor().apply_count(), 1);
        assert_eq!(ctrl.zone(), Zone::Dim);

        ctrl.update_cycle();
        assert_eq!(ctrl.sensor().apply_count(), 1);
    }

    #[test]
    fn test_override_is_not_sticky() {
        let mut ctrl = settled_in(2_000.0);

        ctrl.set_zone(Zone::VeryBright);
        assert_eq!(ctrl.integration_time_ms(), 25);

        // Next cycle reclassifies from the live reading.
        assert_eq!(
            ctrl.update_cycle(),
            ZoneUpdate::Changed {
                from: Zone::VeryBright,
                to: Zone::Dim
            }
        );
    }

    #[test]
    fn test_set_zone_raw_rejects_unknown_index() {
        let mut ctrl = settled_in(2_000.0);

        assert!(matches!(
            ctrl.set_zone_raw(7),
            Err(ControllerError::InvalidZone(7))
        ));
        assert_eq!(ctrl.sensor().apply_count(), 0);
        assert_eq!(ctrl.zone(), Zone::Dim);

        ctrl.set_zone_raw(0).unwrap();
        assert_eq!(ctrl.zone(), Zone::VeryDim);
        assert_eq!(ctrl.gain(), 2.0);
    }

    #[test]
    fn test_retained_mirror_follows_transitions() {
        let retained = Arc::new(RetainedState::new());
        let mut ctrl = ExposureController::new(
            MockLightSensor::with_lux(100.0),
            MockDelay::new(),
            Arc::clone(&retained),
        );

        ctrl.initialize();
        assert_eq!(retained.zone(), Some(Zone::VeryDim));

        ctrl.sensor_mut().set_fallback_lux(12_000.0);
        ctrl.update_cycle();
        assert_eq!(retained.zone(), Some(Zone::Bright));
        assert_eq!(retained.snapshot().confirm_count, 0);
    }

    #[test]
    fn test_retained_mirror_is_not_consulted() {
        let retained = Arc::new(RetainedState::new());
        retained.record_zone(Zone::VeryDim);

        let mut ctrl = ExposureController::new(
            MockLightSensor::with_lux(40_000.0),
            MockDelay::new(),
            retained,
        );
        assert_eq!(ctrl.initialize(), Zone::VeryBright);
    }

    #[test]
    fn test_implausible_reading_falls_to_lowest_zone() {
        let mut ctrl = settled_in(2_000.0);

        ctrl.sensor_mut().set_fallback_lux(f32::NAN);
        assert!(ctrl.update_cycle().is_changed());
        assert_eq!(ctrl.zone(), Zone::VeryDim);
    }

    #[test]
    fn test_raw_channels_and_state() {
        let mut sensor = MockLightSensor::with_lux(700.0);
        sensor.set_raw_channels(321.0, 654.0);
        let mut ctrl = controller(sensor);
        ctrl.initialize();

        assert_eq!(ctrl.als(), 321.0);
        assert_eq!(ctrl.white(), 654.0);

        let state = ctrl.state();
        assert_eq!(state.zone, Zone::VeryDim);
        assert_eq!(state.lux, 700.0);
        assert_eq!(state.gain, 2.0);
        assert_eq!(state.integration_time_ms, 400);
    }
}
