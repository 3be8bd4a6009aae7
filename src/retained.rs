//! Boot-scoped mirror of the controller's zone.
//!
//! On the node this lives in RTC memory: it survives deep sleep but not a cold
//! power loss. The controller writes it and never reads it back.

use crate::zone::{Zone, ZoneProfile};
use log::trace;
use std::sync::atomic::{AtomicI32, Ordering};

/// Retained zone and confirmation counter.
///
/// The values are atomics so a single instance can sit in a `static`
/// retained section or be shared through an `Arc` with a diagnostics task.
#[derive(Debug)]
pub struct RetainedState {
    current_zone: AtomicI32,
    confirm_count: AtomicI32,
}

/// A plain copy of [`RetainedState`] at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetainedSnapshot {
    /// Raw index of the last recorded zone.
    pub current_zone: i32,
    /// Confirmation counter. Always reset to 0 on a zone change.
    pub confirm_count: i32,
}

impl RetainedSnapshot {
    /// Sensor settings implied by the recorded zone.
    ///
    /// Values that do not name a zone map to [`ZoneProfile::FALLBACK`].
    pub fn profile(&self) -> ZoneProfile {
        u8::try_from(self.current_zone)
            .map(ZoneProfile::for_index)
            .unwrap_or(ZoneProfile::FALLBACK)
    }
}

impl RetainedState {
    /// Power-on values: [`Zone::Bright`] with no confirmations.
    pub const fn new() -> Self {
        Self {
            current_zone: AtomicI32::new(Zone::Bright as i32),
            confirm_count: AtomicI32::new(0),
        }
    }

    /// Record a newly applied zone and reset the confirmation counter.
    pub fn record_zone(&self, zone: Zone) {
        self.current_zone.store(zone as i32, Ordering::SeqCst);
        self.confirm_count.store(0, Ordering::SeqCst);
        trace!("retained zone={}, confirm=0", zone as i32);
    }

    /// Copy out the current values.
    pub fn snapshot(&self) -> RetainedSnapshot {
        RetainedSnapshot {
            current_zone: self.current_zone.load(Ordering::SeqCst),
            confirm_count: self.confirm_count.load(Ordering::SeqCst),
        }
    }

    /// The recorded zone, if the raw value names one.
    pub fn zone(&self) -> Option<Zone> {
        let raw = self.current_zone.load(Ordering::SeqCst);
        u8::try_from(raw).ok().and_then(|i| Zone::try_from(i).ok())
    }
}

impl Default for RetainedState {
    fn default() -> Self {
        Self::new()
    }
}
