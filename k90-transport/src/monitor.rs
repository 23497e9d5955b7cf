//! MonitorTransport middleware for tracing control traffic
//!
//! Wraps any `ControlTransport` and logs every request with its decoded
//! meaning, plus the outcome.
//!
//! ```ignore
//! let (_, usb) = UsbDiscovery::new().open_first()?;
//! let transport = MonitorTransport::wrap(usb);
//! // every control transfer is now logged at info level
//! ```

use tracing::{info, warn};

use crate::command::try_parse_command;
use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::ControlTransport;

/// Transport middleware that logs all control requests and replies
pub struct MonitorTransport<T> {
    inner: T,
}

impl<T: ControlTransport> MonitorTransport<T> {
    /// Wrap a transport with logging middleware
    pub fn wrap(inner: T) -> Self {
        Self { inner }
    }

    /// Unwrap back to the inner transport
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: ControlTransport> ControlTransport for MonitorTransport<T> {
    fn control_out(&self, request: u8, value: u16) -> Result<(), TransportError> {
        let parsed = try_parse_command(request, value);
        let result = self.inner.control_out(request, value);
        match &result {
            Ok(()) => info!("→ {} ok", parsed),
            Err(e) => warn!("→ {} failed: {}", parsed, e),
        }
        result
    }

    fn control_in(&self, request: u8, value: u16, len: usize) -> Result<Vec<u8>, TransportError> {
        let parsed = try_parse_command(request, value);
        let result = self.inner.control_in(request, value, len);
        match &result {
            Ok(data) => info!("← {} {:02X?}", parsed, data),
            Err(e) => warn!("← {} failed: {}", parsed, e),
        }
        result
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{ControlCall, ScriptedTransport};

    #[test]
    fn test_passes_through() {
        let inner = ScriptedTransport::new();
        inner.push_in_result(Ok(vec![0, 0, 0, 0, 3, 0, 0, 2]));
        let monitor = MonitorTransport::wrap(inner);

        monitor.control_out(49, 1).unwrap();
        let data = monitor.control_in(4, 0, 8).unwrap();
        assert_eq!(data[4], 3);

        let inner = monitor.into_inner();
        assert_eq!(
            inner.calls(),
            vec![
                ControlCall::Out {
                    request: 49,
                    value: 1
                },
                ControlCall::In {
                    request: 4,
                    value: 0,
                    len: 8
                },
            ]
        );
    }

    #[test]
    fn test_errors_unchanged() {
        let inner = ScriptedTransport::new();
        inner.push_out_result(Err(TransportError::Stall));
        let monitor = MonitorTransport::wrap(inner);

        assert!(matches!(
            monitor.control_out(20, 2),
            Err(TransportError::Stall)
        ));
    }
}
