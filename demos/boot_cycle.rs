//! Example: one wake of a sensor node against a simulated light sensor.
//!
//! Run with: `RUST_LOG=debug cargo run --example boot_cycle`

use std::sync::Arc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use luxzone_core::{
    ControllerError, ExposureController, MockLightSensor, NodeConfig, RemoteConfig,
    RetainedState, SensorReading, ZoneUpdate, celsius_to_fahrenheit, moisture_percent,
};

/// Blocking delay backed by the OS scheduler.
struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

fn main() -> Result<(), ControllerError> {
    // Initialize logging (optional)
    env_logger::init();

    // Dawn, then a cloud breaks and full sun hits the sensor
    let mut sensor = MockLightSensor::with_lux(420.0);
    sensor.push_lux(&[410.0, 425.0, 430.0, 428.0]);
    sensor.set_raw_channels(1830.0, 2410.0);

    let retained = Arc::new(RetainedState::new());
    let mut controller = ExposureController::new(sensor, StdDelay, Arc::clone(&retained));

    let zone = controller.initialize();
    println!(
        "Boot: zone={:?}, gain={}, it={}ms",
        zone,
        controller.gain(),
        controller.integration_time_ms()
    );

    for lux in [450.0, 3_200.0, 31_000.0, 30_500.0] {
        controller.sensor_mut().set_fallback_lux(lux);
        match controller.update_cycle() {
            ZoneUpdate::Changed { from, to } => println!("Cycle: {:?} -> {:?}", from, to),
            ZoneUpdate::Unchanged => println!("Cycle: unchanged ({:?})", controller.zone()),
        }
    }

    let reading = SensorReading {
        timestamp: "2025-06-01T12:00:00Z".to_string(),
        temp_f: celsius_to_fahrenheit(22.4),
        humidity: 51.0,
        lux: controller.lux(),
        moisture: moisture_percent(2875) as f32,
        raw_als: Some(controller.als()),
        raw_white: Some(controller.white()),
    };
    println!("POST body: {}", reading.to_json()?);
    println!("Retained: {:?}", retained.snapshot());

    let mut config = NodeConfig::default();
    let remote = RemoteConfig::from_json(r#"{"data":{"sleep":600,"config_version":7}}"#)?;
    if config.apply(&remote)? {
        println!("Next wake in {:?}", config.sleep_duration());
    }

    Ok(())
}
