//! Brightness zones and their sensor settings.

use crate::error::ControllerError;

/// Averaged lux at or above which the sensor runs in [`Zone::VeryBright`].
pub const TH_VERY_BRIGHT: f32 = 25_000.0;
/// Averaged lux at or above which the sensor runs in [`Zone::Bright`].
pub const TH_BRIGHT: f32 = 5_000.0;
/// Averaged lux at or above which the sensor runs in [`Zone::Dim`].
pub const TH_DIM: f32 = 1_500.0;

// =============================================================================
// Gain
// =============================================================================

/// Light sensor amplification setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gain {
    /// ×1/8
    X1_8,
    /// ×1/4
    X1_4,
    /// ×1
    X1,
    /// ×2
    X2,
}

impl Gain {
    /// The amplification multiplier for this setting.
    pub fn multiplier(self) -> f32 {
        match self {
            Gain::X1_8 => 0.125,
            Gain::X1_4 => 0.25,
            Gain::X1 => 1.0,
            Gain::X2 => 2.0,
        }
    }
}

// =============================================================================
// Integration Time
// =============================================================================

/// Light sensor integration time setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationTime {
    /// 25 ms
    Ms25,
    /// 50 ms
    Ms50,
    /// 100 ms
    Ms100,
    /// 200 ms
    Ms200,
    /// 400 ms
    Ms400,
    /// 800 ms
    Ms800,
}

impl IntegrationTime {
    /// Integration time in milliseconds.
    ///
    /// This is also how long the sensor needs to settle after the setting changes.
    pub fn as_millis(self) -> u16 {
        match self {
            IntegrationTime::Ms25 => 25,
            IntegrationTime::Ms50 => 50,
            IntegrationTime::Ms100 => 100,
            IntegrationTime::Ms200 => 200,
            IntegrationTime::Ms400 => 400,
            IntegrationTime::Ms800 => 800,
        }
    }
}

// =============================================================================
// Zone Profile
// =============================================================================

/// A pre-tuned (gain, integration time) pair applied to the sensor as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneProfile {
    /// Sensor gain.
    pub gain: Gain,
    /// Sensor integration time.
    pub integration_time: IntegrationTime,
}

impl ZoneProfile {
    /// Profile used for a zone index that does not name a known zone.
    pub const FALLBACK: ZoneProfile = ZoneProfile {
        gain: Gain::X1,
        integration_time: IntegrationTime::Ms100,
    };

    /// Look up a profile by raw zone index, falling back to [`ZoneProfile::FALLBACK`].
    pub fn for_index(index: u8) -> Self {
        Zone::try_from(index)
            .map(Zone::profile)
            .unwrap_or(Self::FALLBACK)
    }
}

// =============================================================================
// Zone
// =============================================================================

/// One of four ordered brightness classifications.
///
/// Ordering follows brightness, so `Zone::VeryDim < Zone::VeryBright`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Zone {
    /// Below 1500 lux.
    VeryDim = 0,
    /// 1500 lux up to 5000 lux.
    Dim = 1,
    /// 5000 lux up to 25000 lux.
    Bright = 2,
    /// 25000 lux and above.
    VeryBright = 3,
}

impl Zone {
    /// All zones, darkest first.
    pub const ALL: [Zone; 4] = [Zone::VeryDim, Zone::Dim, Zone::Bright, Zone::VeryBright];

    /// Classify an averaged lux value.
    ///
    /// Thresholds are checked brightest first with `>=`, so a boundary value
    /// belongs to the brighter zone. Anything that passes no threshold,
    /// including NaN and negative readings, is [`Zone::VeryDim`].
    pub fn classify(lux: f32) -> Zone {
        if lux >= TH_VERY_BRIGHT {
            Zone::VeryBright
        } else if lux >= TH_BRIGHT {
            Zone::Bright
        } else if lux >= TH_DIM {
            Zone::Dim
        } else {
            Zone::VeryDim
        }
    }

    /// Sensor settings for this zone.
    pub fn profile(self) -> ZoneProfile {
        let (gain, integration_time) = match self {
            Zone::VeryBright => (Gain::X1_8, IntegrationTime::Ms25),
            Zone::Bright => (Gain::X1_4, IntegrationTime::Ms50),
            Zone::Dim => (Gain::X1, IntegrationTime::Ms200),
            Zone::VeryDim => (Gain::X2, IntegrationTime::Ms400),
        };
        ZoneProfile {
            gain,
            integration_time,
        }
    }

    /// Raw index used by the retained mirror.
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Zone {
    type Error = ControllerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Zone::VeryDim),
            1 => Ok(Zone::Dim),
            2 => Ok(Zone::Bright),
            3 => Ok(Zone::VeryBright),
            other => Err(ControllerError::InvalidZone(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(Zone::classify(1499.999), Zone::VeryDim);
        assert_eq!(Zone::classify(1500.0), Zone::Dim);
        assert_eq!(Zone::classify(4999.999), Zone::Dim);
        assert_eq!(Zone::classify(5000.0), Zone::Bright);
        assert_eq!(Zone::classify(24999.999), Zone::Bright);
        assert_eq!(Zone::classify(25000.0), Zone::VeryBright);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let mut previous = Zone::classify(0.0);
        let mut lux = 0.0f32;
        while lux < 60_000.0 {
            let zone = Zone::classify(lux);
            assert!(zone >= previous, "zone went down at {} lux", lux);
            previous = zone;
            lux += 37.5;
        }
        assert_eq!(previous, Zone::VeryBright);
    }

    #[test]
    fn test_classify_implausible_values() {
        assert_eq!(Zone::classify(0.0), Zone::VeryDim);
        assert_eq!(Zone::classify(-12.0), Zone::VeryDim);
        assert_eq!(Zone::classify(f32::NAN), Zone::VeryDim);
        assert_eq!(Zone::classify(f32::INFINITY), Zone::VeryBright);
    }

    #[test]
    fn test_zone_profiles() {
        let very_dim = Zone::VeryDim.profile();
        assert_eq!(very_dim.gain.multiplier(), 2.0);
        assert_eq!(very_dim.integration_time.as_millis(), 400);

        let dim = Zone::Dim.profile();
        assert_eq!(dim.gain.multiplier(), 1.0);
        assert_eq!(dim.integration_time.as_millis(), 200);

        let bright = Zone::Bright.profile();
        assert_eq!(bright.gain.multiplier(), 0.25);
        assert_eq!(bright.integration_time.as_millis(), 50);

        let very_bright = Zone::VeryBright.profile();
        assert_eq!(very_bright.gain.multiplier(), 0.125);
        assert_eq!(very_bright.integration_time.as_millis(), 25);
    }

    #[test]
    fn test_zone_index_conversion() {
        for zone in Zone::ALL {
            assert_eq!(Zone::try_from(zone.index()).unwrap(), zone);
        }
        assert!(matches!(
            Zone::try_from(4),
            Err(ControllerError::InvalidZone(4))
        ));
        assert_eq!(ZoneProfile::for_index(9), ZoneProfile::FALLBACK);
        assert_eq!(ZoneProfile::for_index(1), Zone::Dim.profile());
    }
}
