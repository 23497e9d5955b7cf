//! Type-safe control request builders and response parsers
//!
//! Every outbound K90 operation is a single vendor request whose argument rides
//! in `wValue`. Arguments are validated when the typed value is built
//! (`Brightness`, `Profile`), so a constructed command is always sendable.

use std::fmt;

use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::error::{ParseError, TransportError};
use crate::protocol::{self, macro_led, macro_mode, request};
use crate::types::{Brightness, MacroMode, Profile};
use crate::ControlTransport;

// =============================================================================
// Core Traits
// =============================================================================

/// A host-to-device request with no data stage
pub trait ControlCommand {
    /// bRequest code
    const REQUEST: u8;

    /// wValue argument
    fn value(&self) -> u16;
}

/// A device-to-host reply
pub trait ControlResponse: Sized {
    /// bRequest code of the query
    const REQUEST: u8;

    /// Number of bytes to request
    const LEN: usize;

    /// Parse from reply bytes (length already checked)
    fn from_data(data: &[u8]) -> Result<Self, ParseError>;

    /// Parse with length validation
    fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::LEN {
            return Err(ParseError::TooShort {
                expected: Self::LEN,
                got: data.len(),
            });
        }
        Self::from_data(data)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Set backlight level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetBrightness {
    pub level: Brightness,
}

impl SetBrightness {
    pub fn new(level: Brightness) -> Self {
        Self { level }
    }
}

impl ControlCommand for SetBrightness {
    const REQUEST: u8 = request::BRIGHTNESS;

    fn value(&self) -> u16 {
        u16::from(self.level.level())
    }
}

/// Switch macro playback between host and firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMacroMode {
    pub mode: MacroMode,
}

impl SetMacroMode {
    pub fn new(mode: MacroMode) -> Self {
        Self { mode }
    }
}

impl ControlCommand for SetMacroMode {
    const REQUEST: u8 = request::MACRO_MODE;

    fn value(&self) -> u16 {
        match self.mode {
            MacroMode::Software => macro_mode::SW,
            MacroMode::Hardware => macro_mode::HW,
        }
    }
}

/// Turn the MR (macro record) LED on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMacroRecordLed {
    pub on: bool,
}

impl SetMacroRecordLed {
    pub fn new(on: bool) -> Self {
        Self { on }
    }
}

impl ControlCommand for SetMacroRecordLed {
    const REQUEST: u8 = request::MACRO_MODE;

    fn value(&self) -> u16 {
        if self.on {
            macro_led::ON
        } else {
            macro_led::OFF
        }
    }
}

/// Select the active profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetProfile {
    pub profile: Profile,
}

impl SetProfile {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }
}

impl ControlCommand for SetProfile {
    const REQUEST: u8 = request::PROFILE;

    fn value(&self) -> u16 {
        u16::from(self.profile.number())
    }
}

// =============================================================================
// Status Query
// =============================================================================

/// Raw status block as returned by `request::STATUS`
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
struct StatusBlock {
    _reserved0: [u8; 4],
    brightness: u8,
    _reserved1: [u8; 2],
    profile: u8,
}

/// Decoded status reply
///
/// The reply is accepted or rejected as a whole. One field out of range fails
/// the parse even when the other is valid, and attach then seeds defaults for
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponse {
    pub brightness: Brightness,
    pub profile: Profile,
}

impl ControlResponse for StatusResponse {
    const REQUEST: u8 = request::STATUS;
    const LEN: usize = protocol::status::LEN;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        let (block, _) = StatusBlock::read_from_prefix(data).map_err(|_| ParseError::TooShort {
            expected: Self::LEN,
            got: data.len(),
        })?;

        let brightness = Brightness::new(block.brightness).map_err(|_| ParseError::InvalidValue {
            field: "brightness",
            value: block.brightness,
        })?;
        let profile = Profile::new(block.profile).map_err(|_| ParseError::InvalidValue {
            field: "profile",
            value: block.profile,
        })?;

        Ok(Self {
            brightness,
            profile,
        })
    }
}

// =============================================================================
// Transport Extension
// =============================================================================

/// Typed send/query on top of any `ControlTransport`
pub trait TransportExt {
    /// Send a typed command
    fn send<C: ControlCommand>(&self, cmd: &C) -> Result<(), TransportError>;

    /// Run a typed query and parse its reply
    fn query<R: ControlResponse>(&self) -> Result<R, TransportError>;
}

impl<T: ControlTransport + ?Sized> TransportExt for T {
    fn send<C: ControlCommand>(&self, cmd: &C) -> Result<(), TransportError> {
        self.control_out(C::REQUEST, cmd.value())
    }

    fn query<R: ControlResponse>(&self) -> Result<R, TransportError> {
        let data = self.control_in(R::REQUEST, 0, R::LEN)?;
        Ok(R::parse(&data)?)
    }
}

// =============================================================================
// Request Decoding (monitor output)
// =============================================================================

/// A control request decoded back into its meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedCommand {
    Brightness(u16),
    MacroMode(MacroMode),
    MacroRecordLed(bool),
    Profile(u16),
    QueryStatus,
    /// Known request code with an unrecognized wValue
    UnknownValue { request: u8, value: u16 },
    Unknown { request: u8, value: u16 },
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness(level) => write!(f, "SET_BRIGHTNESS level={level}"),
            Self::MacroMode(mode) => write!(f, "SET_MACRO_MODE {}", mode.token()),
            Self::MacroRecordLed(on) => {
                write!(f, "SET_MACRO_LED {}", if *on { "ON" } else { "OFF" })
            }
            Self::Profile(p) => write!(f, "SET_PROFILE {p}"),
            Self::QueryStatus => f.write_str("GET_STATUS"),
            Self::UnknownValue { request: r, value } => {
                write!(f, "{} value=0x{value:04X}", request::name(*r))
            }
            Self::Unknown { request: r, value } => {
                write!(f, "REQUEST({r}) value=0x{value:04X}")
            }
        }
    }
}

/// Decode a raw (request, wValue) pair
pub fn try_parse_command(req: u8, value: u16) -> ParsedCommand {
    match (req, value) {
        (request::BRIGHTNESS, v) => ParsedCommand::Brightness(v),
        (request::PROFILE, v) => ParsedCommand::Profile(v),
        (request::STATUS, _) => ParsedCommand::QueryStatus,
        (request::MACRO_MODE, macro_mode::SW) => ParsedCommand::MacroMode(MacroMode::Software),
        (request::MACRO_MODE, macro_mode::HW) => ParsedCommand::MacroMode(MacroMode::Hardware),
        (request::MACRO_MODE, macro_led::ON) => ParsedCommand::MacroRecordLed(true),
        (request::MACRO_MODE, macro_led::OFF) => ParsedCommand::MacroRecordLed(false),
        (request::MACRO_MODE, v) => ParsedCommand::UnknownValue { request: req, value: v },
        (r, v) => ParsedCommand::Unknown { request: r, value: v },
    }
}
