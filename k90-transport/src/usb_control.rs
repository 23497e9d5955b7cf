//! USB control transport over the default endpoint

use std::time::Duration;

use nusb::transfer::{Control, ControlType, Recipient};
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{self, request, timing};
use crate::types::TransportDeviceInfo;
use crate::ControlTransport;

/// Vendor control transport for a directly attached K90
///
/// Requests go to the device recipient on endpoint 0, so no interface has
/// to be claimed and the kernel keyboard driver stays bound.
pub struct UsbControlTransport {
    device: nusb::Device,
    info: TransportDeviceInfo,
    timeout: Duration,
}

impl UsbControlTransport {
    /// Wrap an opened nusb device
    pub fn new(device: nusb::Device, info: TransportDeviceInfo) -> Self {
        Self {
            device,
            info,
            timeout: Duration::from_millis(timing::CONTROL_TIMEOUT_MS),
        }
    }

    fn control(req: u8, value: u16) -> Control {
        Control {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request: req,
            value,
            index: protocol::INDEX,
        }
    }
}

impl ControlTransport for UsbControlTransport {
    fn control_out(&self, req: u8, value: u16) -> Result<(), TransportError> {
        debug!(
            "control OUT {} ({}) value=0x{:04X}",
            request::name(req),
            req,
            value
        );
        self.device
            .control_out_blocking(Self::control(req, value), &[], self.timeout)?;
        Ok(())
    }

    fn control_in(&self, req: u8, value: u16, len: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; len];
        let n = self
            .device
            .control_in_blocking(Self::control(req, value), &mut buf, self.timeout)?;
        buf.truncate(n);
        debug!(
            "control IN {} ({}) -> {} bytes: {:02X?}",
            request::name(req),
            req,
            n,
            buf
        );
        Ok(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}
