//! Cached device state and reconciliation of device-pushed usages

use k90_transport::{Brightness, MacroMode, Profile, StatusResponse};

use crate::usage::Special;

/// Snapshot of the keyboard's settings as last known to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    brightness: Brightness,
    current_profile: Profile,
    macro_mode: MacroMode,
    macro_record: bool,
    meta_locked: bool,
}

/// A state field that changed in response to a device report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    MacroRecord(bool),
    Profile(Profile),
    MetaLocked(bool),
    Brightness(Brightness),
}

impl DeviceState {
    /// Seed from a status reply; the rest starts at defaults
    pub fn from_status(status: &StatusResponse) -> Self {
        Self {
            brightness: status.brightness,
            current_profile: status.profile,
            ..Self::default()
        }
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn current_profile(&self) -> Profile {
        self.current_profile
    }

    pub fn macro_mode(&self) -> MacroMode {
        self.macro_mode
    }

    pub fn macro_record(&self) -> bool {
        self.macro_record
    }

    pub fn meta_locked(&self) -> bool {
        self.meta_locked
    }

    pub fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness;
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.current_profile = profile;
    }

    pub fn set_macro_mode(&mut self, mode: MacroMode) {
        self.macro_mode = mode;
    }

    pub fn set_macro_record(&mut self, on: bool) {
        self.macro_record = on;
    }

    /// Apply a device-pushed special usage
    ///
    /// Returns the field that was written, or `None` for usages with no
    /// state meaning. The keyboard has no usage that sets the meta lock, so
    /// both meta reports clear it.
    pub fn apply(&mut self, special: Special) -> Option<StateChange> {
        let change = match special {
            Special::MacroRecordStart => StateChange::MacroRecord(true),
            Special::MacroRecordStop => StateChange::MacroRecord(false),
            Special::Profile(p) => StateChange::Profile(p),
            Special::MetaOff | Special::MetaOn => StateChange::MetaLocked(false),
            Special::Light(b) => StateChange::Brightness(b),
            Special::Other(_) => return None,
        };

        match change {
            StateChange::MacroRecord(on) => self.macro_record = on,
            StateChange::Profile(p) => self.current_profile = p,
            StateChange::MetaLocked(locked) => self.meta_locked = locked,
            StateChange::Brightness(b) => self.brightness = b,
        }
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::{classify, Usage};

    fn apply_usage(state: &mut DeviceState, usage: u16) -> Option<StateChange> {
        match classify(usage) {
            Usage::Special(s) => state.apply(s),
            _ => None,
        }
    }

    #[test]
    fn test_defaults() {
        let s = DeviceState::default();
        assert_eq!(s.brightness().level(), 0);
        assert_eq!(s.current_profile().number(), 1);
        assert_eq!(s.macro_mode(), MacroMode::Software);
        assert!(!s.macro_record());
        assert!(!s.meta_locked());
    }

    #[test]
    fn test_from_status() {
        let status = StatusResponse {
            brightness: Brightness::new(2).unwrap(),
            profile: Profile::new(3).unwrap(),
        };
        let s = DeviceState::from_status(&status);
        assert_eq!(s.brightness().level(), 2);
        assert_eq!(s.current_profile().number(), 3);
        assert_eq!(s.macro_mode(), MacroMode::Software);
    }

    #[test]
    fn test_record_start_stop() {
        let mut s = DeviceState::default();
        assert_eq!(apply_usage(&mut s, 0xF6), Some(StateChange::MacroRecord(true)));
        assert!(s.macro_record());
        assert_eq!(apply_usage(&mut s, 0xF7), Some(StateChange::MacroRecord(false)));
        assert!(!s.macro_record());
    }

    #[test]
    fn test_profile_buttons() {
        let mut s = DeviceState::default();
        for (usage, expected) in [(0xF1, 1), (0xF2, 2), (0xF3, 3)] {
            apply_usage(&mut s, usage);
            assert_eq!(s.current_profile().number(), expected);
        }
    }

    #[test]
    fn test_light_levels() {
        let mut s = DeviceState::default();
        for (usage, expected) in [(0xFD, 3), (0xFB, 1), (0xFC, 2), (0xFA, 0)] {
            apply_usage(&mut s, usage);
            assert_eq!(s.brightness().level(), expected);
        }
    }

    #[test]
    fn test_meta_on_clears_lock() {
        let mut s = DeviceState {
            meta_locked: true,
            ..Default::default()
        };
        assert_eq!(apply_usage(&mut s, 0xF5), Some(StateChange::MetaLocked(false)));
        assert!(!s.meta_locked());

        s.meta_locked = true;
        apply_usage(&mut s, 0xF4);
        assert!(!s.meta_locked());
    }

    #[test]
    fn test_other_specials_change_nothing() {
        let mut s = DeviceState::default();
        s.set_macro_mode(MacroMode::Hardware);
        let before = s;
        for usage in [0xF0, 0xF8, 0xF9, 0xFE, 0xFF] {
            assert_eq!(apply_usage(&mut s, usage), None);
        }
        assert_eq!(s, before);
    }

    #[test]
    fn test_macro_mode_untouched_by_reports() {
        let mut s = DeviceState::default();
        s.set_macro_mode(MacroMode::Hardware);
        for usage in 0xF0..=0xFFu16 {
            apply_usage(&mut s, usage);
        }
        assert_eq!(s.macro_mode(), MacroMode::Hardware);
    }
}
