//! Mock sensor and delay for testing.

use crate::sensor::LightSensor;
use crate::zone::{Gain, IntegrationTime};
use embedded_hal::delay::DelayNs;
use std::collections::VecDeque;

/// A call made on a [`MockLightSensor`] that touches the hardware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorCall {
    /// [`LightSensor::read_lux`]
    ReadLux,
    /// [`LightSensor::read_als`]
    ReadAls,
    /// [`LightSensor::read_white`]
    ReadWhite,
    /// [`LightSensor::set_gain`]
    SetGain(Gain),
    /// [`LightSensor::set_integration_time`]
    SetIntegrationTime(IntegrationTime),
}

/// A scripted light sensor for testing.
///
/// Lux reads are served from a queue; once it runs dry every read returns the
/// fallback value. Every read and setting change is recorded.
///
/// # Example
///
/// ```
/// use luxzone_core::{LightSensor, MockLightSensor};
///
/// let mut sensor = MockLightSensor::with_lux(100.0);
/// sensor.push_lux(&[1.0, 2.0]);
/// assert_eq!(sensor.read_lux(), 1.0);
/// assert_eq!(sensor.read_lux(), 2.0);
/// assert_eq!(sensor.read_lux(), 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct MockLightSensor {
    script: VecDeque<f32>,
    fallback_lux: f32,
    als: f32,
    white: f32,
    gain: Option<Gain>,
    integration_time: Option<IntegrationTime>,
    calls: Vec<SensorCall>,
}

impl MockLightSensor {
    /// Create a mock that reads 0 lux with no settings loaded.
    pub fn new() -> Self {
        Self::with_lux(0.0)
    }

    /// Create a mock that reads `lux` until scripted otherwise.
    pub fn with_lux(lux: f32) -> Self {
        Self {
            script: VecDeque::new(),
            fallback_lux: lux,
            als: 0.0,
            white: 0.0,
            gain: None,
            integration_time: None,
            calls: Vec::new(),
        }
    }

    /// Queue lux values to be returned by the next reads, in order.
    pub fn push_lux(&mut self, values: &[f32]) {
        self.script.extend(values.iter().copied());
    }

    /// Change the value returned once the queue is empty.
    pub fn set_fallback_lux(&mut self, lux: f32) {
        self.fallback_lux = lux;
    }

    /// Set the values returned by the raw ALS and white channels.
    pub fn set_raw_channels(&mut self, als: f32, white: f32) {
        self.als = als;
        self.white = white;
    }

    /// The gain last loaded, if any.
    pub fn gain(&self) -> Option<Gain> {
        self.gain
    }

    /// The integration time last loaded, if any.
    pub fn integration_time(&self) -> Option<IntegrationTime> {
        self.integration_time
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> &[SensorCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of hardware reconfigurations since the log was last cleared.
    pub fn apply_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SensorCall::SetGain(_)))
            .count()
    }
}

impl Default for MockLightSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl LightSensor for MockLightSensor {
    fn read_lux(&mut self) -> f32 {
        self.calls.push(SensorCall::ReadLux);
        self.script.pop_front().unwrap_or(self.fallback_lux)
    }

    fn read_als(&mut self) -> f32 {
        self.calls.push(SensorCall::ReadAls);
        self.als
    }

    fn read_white(&mut self) -> f32 {
        self.calls.push(SensorCall::ReadWhite);
        self.white
    }

    fn set_gain(&mut self, gain: Gain) {
        self.calls.push(SensorCall::SetGain(gain));
        self.gain = Some(gain);
    }

    fn set_integration_time(&mut self, integration_time: IntegrationTime) {
        self.calls.push(SensorCall::SetIntegrationTime(integration_time));
        self.integration_time = Some(integration_time);
    }

    fn gain_value(&self) -> f32 {
        self.gain.unwrap_or(Gain::X1).multiplier()
    }

    fn integration_time_ms(&self) -> u16 {
        self.integration_time
            .unwrap_or(IntegrationTime::Ms100)
            .as_millis()
    }
}

/// A delay provider that records requested waits instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    delays_ms: Vec<u32>,
    total_ns: u64,
}

impl MockDelay {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Millisecond delays requested through `delay_ms`, in order.
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }

    /// Total simulated time across all delay calls, in nanoseconds.
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}
