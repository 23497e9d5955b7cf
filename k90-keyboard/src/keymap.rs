//! G-key to key code table
//!
//! G1-G12 land on F13-F24 and G13-G18 on the generic misc buttons, so the
//! keys are usable out of the box without clashing with anything on a
//! standard layout. The table can only be replaced as a whole.

use serde::{Deserialize, Serialize};

use crate::error::KeyboardError;
use crate::usage::{GKey, GKEY_COUNT};

/// Linux input key codes used by the default table
pub mod key_codes {
    pub const KEY_F13: u16 = 183;
    pub const KEY_F14: u16 = 184;
    pub const KEY_F15: u16 = 185;
    pub const KEY_F16: u16 = 186;
    pub const KEY_F17: u16 = 187;
    pub const KEY_F18: u16 = 188;
    pub const KEY_F19: u16 = 189;
    pub const KEY_F20: u16 = 190;
    pub const KEY_F21: u16 = 191;
    pub const KEY_F22: u16 = 192;
    pub const KEY_F23: u16 = 193;
    pub const KEY_F24: u16 = 194;
    pub const BTN_MISC: u16 = 0x100;
}

use key_codes::*;

/// Default table, index 0 = G1
pub const DEFAULT_GKEY_CODES: [u16; GKEY_COUNT] = [
    KEY_F13,
    KEY_F14,
    KEY_F15,
    KEY_F16,
    KEY_F17,
    KEY_F18,
    KEY_F19,
    KEY_F20,
    KEY_F21,
    KEY_F22,
    KEY_F23,
    KEY_F24,
    BTN_MISC,
    BTN_MISC + 1,
    BTN_MISC + 2,
    BTN_MISC + 3,
    BTN_MISC + 4,
    BTN_MISC + 5,
];

/// Immutable G-key mapping table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u16>", into = "Vec<u16>")]
pub struct KeyMap {
    codes: [u16; GKEY_COUNT],
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            codes: DEFAULT_GKEY_CODES,
        }
    }
}

impl KeyMap {
    /// Build a table from exactly 18 codes
    pub fn from_slice(codes: &[u16]) -> Result<Self, KeyboardError> {
        let codes: [u16; GKEY_COUNT] = codes.try_into().map_err(|_| {
            KeyboardError::InvalidKeyMap(format!(
                "expected {GKEY_COUNT} key codes, got {}",
                codes.len()
            ))
        })?;
        Ok(Self { codes })
    }

    /// Key code for a classified G-key
    pub fn map(&self, gkey: GKey) -> u16 {
        self.codes[gkey.index()]
    }

    /// Key code for a 1-based G-key number, `None` outside 1..=18
    pub fn get(&self, number: u8) -> Option<u16> {
        GKey::new(number).map(|g| self.map(g))
    }

    /// Raw table, index 0 = G1
    pub fn codes(&self) -> &[u16; GKEY_COUNT] {
        &self.codes
    }

    /// (G-key, code) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (GKey, u16)> + '_ {
        GKey::all().map(move |g| (g, self.map(g)))
    }
}

impl TryFrom<Vec<u16>> for KeyMap {
    type Error = KeyboardError;

    fn try_from(codes: Vec<u16>) -> Result<Self, Self::Error> {
        Self::from_slice(&codes)
    }
}

impl From<KeyMap> for Vec<u16> {
    fn from(map: KeyMap) -> Self {
        map.codes.to_vec()
    }
}
