//! Usage classification
//!
//! The K90 reports its extra controls as keyboard-page usages. G-keys sit in
//! 0xD0-0xDF and 0xE8-0xE9; everything in 0xF0-0xFF is a state report (MR,
//! profile buttons, meta lock, backlight) rather than a key. Classification
//! is a pure function of the usage ID.

use std::fmt;

use k90_transport::{Brightness, Profile};

/// Number of G-keys (G1-G18)
pub const GKEY_COUNT: usize = 18;

/// Usage IDs
pub mod codes {
    pub const G1: u16 = 0xD0;
    pub const G16: u16 = 0xDF;
    pub const G17: u16 = 0xE8;
    pub const G18: u16 = 0xE9;

    pub const SPECIAL_MIN: u16 = 0xF0;
    pub const SPECIAL_MAX: u16 = 0xFF;

    pub const MACRO_RECORD_START: u16 = 0xF6;
    pub const MACRO_RECORD_STOP: u16 = 0xF7;

    pub const M1: u16 = 0xF1;
    pub const M2: u16 = 0xF2;
    pub const M3: u16 = 0xF3;

    pub const META_OFF: u16 = 0xF4;
    pub const META_ON: u16 = 0xF5;

    pub const LIGHT_OFF: u16 = 0xFA;
    pub const LIGHT_DIM: u16 = 0xFB;
    pub const LIGHT_MEDIUM: u16 = 0xFC;
    pub const LIGHT_BRIGHT: u16 = 0xFD;
}

/// A G-key number, 1 to 18
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GKey(u8);

impl GKey {
    /// Build from a 1-based key number
    pub fn new(number: u8) -> Option<Self> {
        (1..=GKEY_COUNT as u8).contains(&number).then_some(Self(number))
    }

    /// 1-based key number (G1 = 1)
    pub fn number(self) -> u8 {
        self.0
    }

    /// 0-based table index
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All G-keys in order
    pub fn all() -> impl Iterator<Item = GKey> {
        (1..=GKEY_COUNT as u8).map(GKey)
    }
}

impl fmt::Display for GKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// State-reporting usages in 0xF0-0xFF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    MacroRecordStart,
    MacroRecordStop,
    /// M1/M2/M3 pressed
    Profile(Profile),
    MetaOff,
    MetaOn,
    /// Backlight level reported by the keyboard
    Light(Brightness),
    /// In the special range but carries no known meaning
    Other(u16),
}

/// Result of classifying one usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    GKey(GKey),
    Special(Special),
    /// Left to the generic key mapping
    Unclassified,
}

/// Map a usage to its G-key number, 0 if it is not a G-key
pub fn usage_to_gkey(usage: u16) -> u8 {
    match usage {
        codes::G1..=codes::G16 => (usage - codes::G1 + 1) as u8,
        codes::G17..=codes::G18 => (usage - codes::G17 + 17) as u8,
        _ => 0,
    }
}

/// Classify a usage ID
///
/// G-keys are tested first, then the special range, so a usage can never be
/// both.
pub fn classify(usage: u16) -> Usage {
    if let Some(gkey) = GKey::new(usage_to_gkey(usage)) {
        return Usage::GKey(gkey);
    }

    match usage {
        codes::SPECIAL_MIN..=codes::SPECIAL_MAX => Usage::Special(classify_special(usage)),
        _ => Usage::Unclassified,
    }
}

fn classify_special(usage: u16) -> Special {
    match usage {
        codes::MACRO_RECORD_START => Special::MacroRecordStart,
        codes::MACRO_RECORD_STOP => Special::MacroRecordStop,
        codes::M1..=codes::M3 => Special::Profile(Profile::ALL[usize::from(usage - codes::M1)]),
        codes::META_OFF => Special::MetaOff,
        codes::META_ON => Special::MetaOn,
        codes::LIGHT_OFF..=codes::LIGHT_BRIGHT => {
            Special::Light(Brightness::ALL[usize::from(usage - codes::LIGHT_OFF)])
        }
        other => Special::Other(other),
    }
}

/// True for usages that report state and must never produce key events
pub fn is_special(usage: u16) -> bool {
    matches!(classify(usage), Usage::Special(_))
}
