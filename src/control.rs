//! Line protocol for the live control surface
//!
//! One request per line:
//!
//! ```text
//! get <attr>
//! set <attr> <value>
//! status
//! ```
//!
//! Replies mirror attribute reads: the value followed by a newline, or
//! `ERR <message>` on failure.

use k90_keyboard::{Attribute, Driver, InterfaceId, KeyboardError};
use k90_transport::ControlTransport;

/// A parsed control line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    Get(String),
    Set(String, String),
    Status,
}

impl ControlRequest {
    /// Parse one line; `None` for blank lines
    pub fn parse(line: &str) -> Result<Option<Self>, KeyboardError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let request = match (verb, words.next(), words.next()) {
            ("get", Some(attr), None) => Self::Get(attr.to_string()),
            ("set", Some(attr), Some(value)) => Self::Set(attr.to_string(), value.to_string()),
            ("status", None, None) => Self::Status,
            _ => {
                return Err(KeyboardError::InvalidParameter(format!(
                    "unrecognized request '{}'",
                    line.trim()
                )))
            }
        };

        if words.next().is_some() {
            return Err(KeyboardError::InvalidParameter(format!(
                "trailing input in '{}'",
                line.trim()
            )));
        }
        Ok(Some(request))
    }
}

/// Run a request against an interface and render the reply
pub fn execute<T: ControlTransport>(
    driver: &Driver<T>,
    id: InterfaceId,
    request: &ControlRequest,
) -> Result<String, KeyboardError> {
    match request {
        ControlRequest::Get(attr) => driver.show(id, attr),
        ControlRequest::Set(attr, value) => {
            driver.store(id, attr, value)?;
            driver.show(id, attr)
        }
        ControlRequest::Status => {
            let mut out = String::new();
            for attr in Attribute::ALL {
                out.push_str(attr.name());
                out.push_str(": ");
                out.push_str(&driver.show(id, attr.name())?);
            }
            Ok(out)
        }
    }
}

/// Parse and execute one line, folding errors into an `ERR` reply
pub fn handle_line<T: ControlTransport>(
    driver: &Driver<T>,
    id: InterfaceId,
    line: &str,
) -> Option<String> {
    let result = ControlRequest::parse(line)
        .transpose()?
        .and_then(|req| execute(driver, id, &req));
    Some(result.unwrap_or_else(|e| format!("ERR {e}\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k90_keyboard::KeyMap;
    use k90_transport::scripted::ScriptedTransport;

    const IFACE: InterfaceId = InterfaceId {
        bus: 1,
        address: 2,
        interface: 0,
    };

    fn driver() -> Driver<ScriptedTransport> {
        let mut d = Driver::new(KeyMap::default());
        d.attach(IFACE, ScriptedTransport::with_status([0, 0, 0, 0, 2, 0, 0, 1]))
            .unwrap();
        d
    }

    #[test]
    fn test_parse() {
        assert_eq!(ControlRequest::parse("   ").unwrap(), None);
        assert_eq!(
            ControlRequest::parse("get brightness\n").unwrap(),
            Some(ControlRequest::Get("brightness".into()))
        );
        assert_eq!(
            ControlRequest::parse("set macro_mode HW").unwrap(),
            Some(ControlRequest::Set("macro_mode".into(), "HW".into()))
        );
        assert!(ControlRequest::parse("set brightness").is_err());
        assert!(ControlRequest::parse("get a b").is_err());
        assert!(ControlRequest::parse("reboot").is_err());
    }

    #[test]
    fn test_get_and_set() {
        let d = driver();
        assert_eq!(handle_line(&d, IFACE, "get brightness").unwrap(), "2\n");
        assert_eq!(handle_line(&d, IFACE, "set brightness 0").unwrap(), "0\n");
        assert_eq!(handle_line(&d, IFACE, "").as_deref(), None);
    }

    #[test]
    fn test_errors_become_replies() {
        let d = driver();
        let reply = handle_line(&d, IFACE, "set brightness 9").unwrap();
        assert!(reply.starts_with("ERR "), "{reply}");
        assert_eq!(handle_line(&d, IFACE, "get brightness").unwrap(), "2\n");
    }

    #[test]
    fn test_status() {
        let d = driver();
        let reply = handle_line(&d, IFACE, "status").unwrap();
        assert_eq!(
            reply,
            "brightness: 2\nmacro_mode: SW\nmacro_record: OFF\ncurrent_profile: 1\n"
        );
    }
}
