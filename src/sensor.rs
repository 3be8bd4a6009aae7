//! Light sensor capability consumed by the exposure controller.

use crate::zone::{Gain, IntegrationTime};

/// Trait for ambient light sensor drivers.
///
/// Matches the surface of a VEML7700-class driver: reads always yield a value
/// and settings are applied synchronously. Implement this for a real driver on
/// the target, or use [`MockLightSensor`](crate::MockLightSensor) in tests.
pub trait LightSensor {
    /// Read illuminance in lux using the currently loaded settings.
    fn read_lux(&mut self) -> f32;

    /// Read the raw ambient light channel.
    fn read_als(&mut self) -> f32;

    /// Read the raw white channel.
    fn read_white(&mut self) -> f32;

    /// Load a gain setting into the sensor.
    fn set_gain(&mut self, gain: Gain);

    /// Load an integration time setting into the sensor.
    fn set_integration_time(&mut self, integration_time: IntegrationTime);

    /// The gain multiplier currently loaded.
    fn gain_value(&self) -> f32;

    /// The integration time currently loaded, in milliseconds.
    fn integration_time_ms(&self) -> u16;
}

impl<T: LightSensor + ?Sized> LightSensor for &mut T {
    fn read_lux(&mut self) -> f32 {
        (**self).read_lux()
    }

    fn read_als(&mut self) -> f32 {
        (**self).read_als()
    }

    fn read_white(&mut self) -> f32 {
        (**self).read_white()
    }

    fn set_gain(&mut self, gain: Gain) {
        (**self).set_gain(gain)
    }

    fn set_integration_time(&mut self, integration_time: IntegrationTime) {
        (**self).set_integration_time(integration_time)
    }

    fn gain_value(&self) -> f32 {
        (**self).gain_value()
    }

    fn integration_time_ms(&self) -> u16 {
        (**self).integration_time_ms()
    }
}
