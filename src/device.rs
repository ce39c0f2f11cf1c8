//! Device settings aggregate
//!
//! The in-memory working copy of everything the tool can configure on the mouse. Profiles are
//! loaded into and saved from this value; it is not linked to any profile after a load.

use crate::button::ButtonBank;
use crate::error::{ProfileError, Result};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::warn;

/// Sensor sensitivity, validated to the range the sensor supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dpi(u32);

impl Dpi {
    pub const MIN: u32 = 400;
    pub const MAX: u32 = 19000;
    pub const DEFAULT: u32 = 800;

    pub fn new(value: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ProfileError::InvalidDpi(value))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Report rate of the sensor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum PollingRate {
    #[strum(serialize = "125Hz")]
    Hz125,
    #[strum(serialize = "250Hz")]
    Hz250,
    #[strum(serialize = "500Hz")]
    Hz500,
    #[default]
    #[strum(serialize = "1000Hz")]
    Hz1000,
}

impl PollingRate {
    pub fn hz(self) -> u16 {
        match self {
            PollingRate::Hz125 => 125,
            PollingRate::Hz250 => 250,
            PollingRate::Hz500 => 500,
            PollingRate::Hz1000 => 1000,
        }
    }

    pub fn from_hz(hz: u16) -> Result<Self> {
        PollingRate::iter()
            .find(|rate| rate.hz() == hz)
            .ok_or_else(|| ProfileError::InvalidPollingRate(hz.to_string()))
    }

    /// Parse the stored text form ("500Hz"); a bare number is accepted too
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Ok(rate) = PollingRate::from_str(text) {
            return Ok(rate);
        }
        text.parse::<u16>()
            .map_err(|_| ProfileError::InvalidPollingRate(text.to_string()))
            .and_then(PollingRate::from_hz)
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Surface the sensor is calibrated for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Surface {
    #[default]
    Auto,
    Cloth,
    Hard,
    Glass,
    Custom,
}

impl Surface {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Settings from the advanced panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedSettings {
    /// Number of DPI stages cycled by the DPI buttons (1-5)
    pub dpi_stages: u8,
    pub angle_snapping: bool,
    pub surface: Surface,
}

impl AdvancedSettings {
    pub const MIN_STAGES: u8 = 1;
    pub const MAX_STAGES: u8 = 5;

    pub fn set_dpi_stages(&mut self, stages: i64) {
        let clamped = stages.clamp(Self::MIN_STAGES as i64, Self::MAX_STAGES as i64) as u8;
        if clamped as i64 != stages {
            warn!("DPI stages {} out of range, using {}", stages, clamped);
        }
        self.dpi_stages = clamped;
    }
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            dpi_stages: 4,
            angle_snapping: false,
            surface: Surface::Auto,
        }
    }
}

/// Complete device configuration snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    pub dpi: Dpi,
    pub polling_rate: PollingRate,
    pub buttons: ButtonBank,
    pub advanced: AdvancedSettings,
}

impl DeviceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dpi(&mut self, value: u32) -> Result<()> {
        self.dpi = Dpi::new(value)?;
        Ok(())
    }

    pub fn set_polling_rate(&mut self, rate: PollingRate) {
        self.polling_rate = rate;
    }
}
