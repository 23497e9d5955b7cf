//! Transport layer for the Corsair Vengeance K90
//!
//! This crate owns everything that touches the wire:
//!
//! - Vendor control transfers on the default endpoint (nusb)
//! - Typed request builders and the status reply decoder
//! - Raw keyboard input reports turned into usage events (hidapi)
//!
//! Device state and usage semantics live one layer up, in `k90-keyboard`.

pub mod command;
pub mod device_registry;
pub mod error;
pub mod event_reader;
pub mod monitor;
pub mod protocol;
pub mod types;

mod discovery;
mod usb_control;

#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use command::{
    try_parse_command, ControlCommand, ControlResponse, ParsedCommand, SetBrightness,
    SetMacroMode, SetMacroRecordLed, SetProfile, StatusResponse, TransportExt,
};
pub use device_registry::{is_k90, PRIMARY_INTERFACE, PRODUCT_ID, VENDOR_ID};
pub use discovery::{open_input_device, UsbDiscovery};
pub use error::{ParseError, TransportError, ValueError};
pub use event_reader::{EventReader, EventReaderConfig, KeyArrayDecoder};
pub use monitor::MonitorTransport;
pub use types::{
    Brightness, DiscoveredDevice, MacroMode, Profile, TimestampedEvent, TransportDeviceInfo,
    UsageEvent,
};
pub use usb_control::UsbControlTransport;

use std::sync::Arc;

/// The core transport trait: blocking vendor control transfers on endpoint 0
///
/// Every K90 request is a vendor-type, device-recipient transfer with
/// `wIndex = 0`. OUT requests carry their argument in `wValue` and have no
/// data stage; the only IN request is the status query.
pub trait ControlTransport: Send + Sync {
    /// Send a host-to-device request with no data stage
    ///
    /// # Arguments
    /// * `request` - bRequest (e.g. `protocol::request::BRIGHTNESS`)
    /// * `value` - wValue argument
    fn control_out(&self, request: u8, value: u16) -> Result<(), TransportError>;

    /// Send a device-to-host request and read up to `len` bytes
    ///
    /// # Returns
    /// The bytes actually received, which may be fewer than `len`
    fn control_in(&self, request: u8, value: u16, len: usize) -> Result<Vec<u8>, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

impl<T: ControlTransport + ?Sized> ControlTransport for Arc<T> {
    fn control_out(&self, request: u8, value: u16) -> Result<(), TransportError> {
        (**self).control_out(request, value)
    }

    fn control_in(&self, request: u8, value: u16, len: usize) -> Result<Vec<u8>, TransportError> {
        (**self).control_in(request, value, len)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }
}

impl<T: ControlTransport + ?Sized> ControlTransport for Box<T> {
    fn control_out(&self, request: u8, value: u16) -> Result<(), TransportError> {
        (**self).control_out(request, value)
    }

    fn control_in(&self, request: u8, value: u16, len: usize) -> Result<Vec<u8>, TransportError> {
        (**self).control_in(request, value, len)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }
}

/// Type alias for a shared, type-erased transport
pub type BoxedTransport = Arc<dyn ControlTransport>;
