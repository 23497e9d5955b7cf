//! Common types for the transport layer

use std::fmt;

use crate::error::ValueError;

/// Device identification information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// USB bus number
    pub bus_number: u8,
    /// USB device address on the bus
    pub device_address: u8,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Bus path in `usb:BBB/DDD` form
    pub fn bus_path(&self) -> String {
        format!("usb:{:03}/{:03}", self.bus_number, self.device_address)
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
    /// Interface numbers exposed by the active configuration
    pub interfaces: Vec<u8>,
}

/// Backlight level, 0 (off) to 3 (bright)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: u8 = 3;
    pub const OFF: Self = Self(0);
    /// Every level in ascending order
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Validate a raw level
    pub fn new(level: u8) -> Result<Self, ValueError> {
        Self::try_from(i64::from(level))
    }

    /// Raw level as sent on the wire
    pub fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(level) if level <= Self::MAX => Ok(Self(level)),
            _ => Err(ValueError::OutOfRange {
                field: "brightness",
                value,
                min: 0,
                max: Self::MAX,
            }),
        }
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hardware profile slot, 1 to 3 (M1-M3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Profile(u8);

impl Profile {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;
    pub const FIRST: Self = Self(1);
    /// M1, M2, M3
    pub const ALL: [Self; 3] = [Self(1), Self(2), Self(3)];

    /// Validate a raw profile number
    pub fn new(profile: u8) -> Result<Self, ValueError> {
        Self::try_from(i64::from(profile))
    }

    /// Raw profile number as sent on the wire
    pub fn number(self) -> u8 {
        self.0
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<i64> for Profile {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(p) if (Self::MIN..=Self::MAX).contains(&p) => Ok(Self(p)),
            _ => Err(ValueError::OutOfRange {
                field: "profile",
                value,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who plays back recorded macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MacroMode {
    /// Host software handles G-key macros
    #[default]
    Software,
    /// Keyboard firmware plays macros itself
    Hardware,
}

impl MacroMode {
    /// Control-surface token ("SW" / "HW")
    pub fn token(self) -> &'static str {
        match self {
            Self::Software => "SW",
            Self::Hardware => "HW",
        }
    }
}

/// A single usage change from an input report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageEvent {
    /// Usage ID within the keyboard page
    pub usage: u16,
    /// 1 = pressed, 0 = released
    pub value: i32,
}

impl UsageEvent {
    pub fn pressed(usage: u16) -> Self {
        Self { usage, value: 1 }
    }

    pub fn released(usage: u16) -> Self {
        Self { usage, value: 0 }
    }
}

/// Usage event with a timestamp (seconds since the reader started)
#[derive(Debug, Clone, Copy)]
pub struct TimestampedEvent {
    pub timestamp: f64,
    pub event: UsageEvent,
}

impl TimestampedEvent {
    pub fn new(timestamp: f64, event: UsageEvent) -> Self {
        Self { timestamp, event }
    }
}
