//! Adaptive gain and integration-time control for ambient light sensors.
//!
//! This crate keeps a VEML7700-class light sensor in range on a battery-powered
//! soil/environment sensor node. Ambient brightness is classified into four
//! zones, each with a pre-tuned gain and integration time, and the sensor is
//! reconfigured only when the zone changes.
//!
//! It also carries the node-side pieces the controller feeds: the telemetry
//! record posted to the collection server and the remote configuration rules.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use luxzone_core::{ExposureController, LightSensor, RetainedState, ZoneUpdate};
//!
//! fn run<S: LightSensor, D: embedded_hal::delay::DelayNs>(sensor: S, delay: D) {
//!     // Lives in RTC memory on the device.
//!     let retained = Arc::new(RetainedState::new());
//!     let mut controller = ExposureController::new(sensor, delay, retained);
//!
//!     // Once per wake
//!     let zone = controller.initialize();
//!     println!("Booted in {:?}", zone);
//!
//!     // Once per sampling cycle
//!     if let ZoneUpdate::Changed { from, to } = controller.update_cycle() {
//!         println!("Zone {:?} -> {:?}", from, to);
//!     }
//!     println!("Lux: {:.1}", controller.lux());
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockLightSensor`] and [`MockDelay`] to test code without hardware:
//!
//! ```
//! use std::sync::Arc;
//! use luxzone_core::{ExposureController, MockDelay, MockLightSensor, RetainedState, Zone};
//!
//! let mut controller = ExposureController::new(
//!     MockLightSensor::with_lux(8000.0),
//!     MockDelay::new(),
//!     Arc::new(RetainedState::new()),
//! );
//! assert_eq!(controller.initialize(), Zone::Bright);
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod mock;
mod retained;
mod sensor;
mod state;
mod telemetry;
mod zone;

// Re-export public API
pub use config::{
    CONNECT_TIMEOUT_MS, DEFAULT_SLEEP_SEC, MAX_SLEEP_SEC, MIN_SLEEP_SEC, NodeConfig, RemoteConfig,
};
pub use controller::{ExposureController, SAMPLE_COUNT, SAMPLE_SPACING_MS};
pub use error::ControllerError;
pub use mock::{MockDelay, MockLightSensor, SensorCall};
pub use retained::{RetainedSnapshot, RetainedState};
pub use sensor::LightSensor;
pub use state::{ControllerState, ZoneUpdate};
pub use telemetry::{SensorReading, celsius_to_fahrenheit, moisture_percent};
pub use zone::{Gain, IntegrationTime, TH_BRIGHT, TH_DIM, TH_VERY_BRIGHT, Zone, ZoneProfile};
