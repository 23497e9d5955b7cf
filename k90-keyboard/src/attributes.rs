//! Named attributes: text in, text out
//!
//! Reads render the cached value followed by a newline. Writes accept one
//! optional trailing newline, validate, perform the control transfer and
//! report how many bytes were consumed.

use std::fmt;
use std::str::FromStr;

use k90_transport::{Brightness, ControlTransport, MacroMode, Profile};

use crate::device::K90Device;
use crate::error::KeyboardError;

/// Attributes exposed by a primary interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Brightness,
    MacroMode,
    MacroRecord,
    CurrentProfile,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Brightness,
        Attribute::MacroMode,
        Attribute::MacroRecord,
        Attribute::CurrentProfile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Brightness => "brightness",
            Attribute::MacroMode => "macro_mode",
            Attribute::MacroRecord => "macro_record",
            Attribute::CurrentProfile => "current_profile",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = KeyboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| KeyboardError::InvalidParameter(format!("unknown attribute '{s}'")))
    }
}

/// Render an attribute from cached state
pub fn show<T: ControlTransport>(device: &K90Device<T>, attr: Attribute) -> String {
    let state = device.state();
    match attr {
        Attribute::Brightness => format!("{}\n", state.brightness()),
        Attribute::MacroMode => format!("{}\n", state.macro_mode().token()),
        Attribute::MacroRecord => format!("{}\n", on_off(state.macro_record())),
        Attribute::CurrentProfile => format!("{}\n", state.current_profile()),
    }
}

/// Parse and apply a write; returns `input.len()` on success
pub fn store<T: ControlTransport>(
    device: &K90Device<T>,
    attr: Attribute,
    input: &str,
) -> Result<usize, KeyboardError> {
    let text = input.strip_suffix('\n').unwrap_or(input);

    match attr {
        Attribute::Brightness => {
            let level = Brightness::try_from(parse_int(attr, text)?)?;
            device.set_brightness(level)?;
        }
        Attribute::CurrentProfile => {
            let profile = Profile::try_from(parse_int(attr, text)?)?;
            device.set_profile(profile)?;
        }
        Attribute::MacroMode => {
            let mode = match text {
                "SW" => MacroMode::Software,
                "HW" => MacroMode::Hardware,
                _ => return Err(invalid_token(attr, text, "SW or HW")),
            };
            device.set_macro_mode(mode)?;
        }
        Attribute::MacroRecord => {
            let on = match text {
                "ON" => true,
                "OFF" => false,
                _ => return Err(invalid_token(attr, text, "ON or OFF")),
            };
            device.set_macro_record(on)?;
        }
    }

    Ok(input.len())
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

fn parse_int(attr: Attribute, text: &str) -> Result<i64, KeyboardError> {
    text.parse::<i64>().map_err(|_| {
        KeyboardError::InvalidParameter(format!("{attr}: '{text}' is not an integer"))
    })
}

fn invalid_token(attr: Attribute, text: &str, expected: &str) -> KeyboardError {
    KeyboardError::InvalidParameter(format!("{attr}: expected {expected}, got '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k90_transport::scripted::ScriptedTransport;

    fn device() -> K90Device<ScriptedTransport> {
        K90Device::attach(ScriptedTransport::with_status([0, 0, 0, 0, 1, 0, 0, 2]))
    }

    #[test]
    fn test_attribute_names() {
        for attr in Attribute::ALL {
            assert_eq!(attr.name().parse::<Attribute>().unwrap(), attr);
        }
        assert!("Brightness".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_show_initial() {
        let dev = device();
        assert_eq!(show(&dev, Attribute::Brightness), "1\n");
        assert_eq!(show(&dev, Attribute::CurrentProfile), "2\n");
        assert_eq!(show(&dev, Attribute::MacroMode), "SW\n");
        assert_eq!(show(&dev, Attribute::MacroRecord), "OFF\n");
    }

    #[test]
    fn test_store_returns_input_len() {
        let dev = device();
        assert_eq!(store(&dev, Attribute::Brightness, "3\n").unwrap(), 2);
        assert_eq!(store(&dev, Attribute::MacroMode, "HW").unwrap(), 2);
        assert_eq!(store(&dev, Attribute::MacroRecord, "ON\n").unwrap(), 3);
        assert_eq!(show(&dev, Attribute::Brightness), "3\n");
        assert_eq!(show(&dev, Attribute::MacroRecord), "ON\n");
    }

    #[test]
    fn test_store_signed_int() {
        let dev = device();
        store(&dev, Attribute::CurrentProfile, "+3").unwrap();
        assert_eq!(show(&dev, Attribute::CurrentProfile), "3\n");
        assert!(store(&dev, Attribute::CurrentProfile, "-1").is_err());
    }

    #[test]
    fn test_store_rejects_before_io() {
        let dev = device();
        let before = dev.transport().calls().len();

        for (attr, input) in [
            (Attribute::Brightness, "4"),
            (Attribute::Brightness, "abc"),
            (Attribute::Brightness, ""),
            (Attribute::CurrentProfile, "0"),
            (Attribute::CurrentProfile, "4"),
            (Attribute::MacroMode, "bogus"),
            (Attribute::MacroMode, "sw"),
            (Attribute::MacroRecord, "1"),
        ] {
            let err = store(&dev, attr, input).unwrap_err();
            assert!(err.is_validation(), "{attr} {input:?}: {err}");
        }

        assert_eq!(dev.transport().calls().len(), before);
        assert_eq!(show(&dev, Attribute::Brightness), "1\n");
        assert_eq!(show(&dev, Attribute::MacroMode), "SW\n");
    }

    #[test]
    fn test_only_one_newline_stripped() {
        let dev = device();
        assert!(store(&dev, Attribute::MacroMode, "HW\n\n").is_err());
    }
}
