//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("Communication timeout")]
    Timeout,

    #[error("Request rejected by device (stall)")]
    Stall,

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] ParseError),

    // USB control errors
    #[error("USB error: {0}")]
    Usb(String),

    #[error("USB permission denied: {0}")]
    UsbPermissionDenied(String),

    // HID input errors
    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<nusb::transfer::TransferError> for TransportError {
    fn from(e: nusb::transfer::TransferError) -> Self {
        use nusb::transfer::TransferError;
        match e {
            // Blocking transfers are cancelled when their timeout expires
            TransferError::Cancelled => TransportError::Timeout,
            TransferError::Stall => TransportError::Stall,
            TransferError::Disconnected => TransportError::Disconnected,
            other => TransportError::Usb(other.to_string()),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            TransportError::UsbPermissionDenied(e.to_string())
        } else {
            TransportError::Usb(e.to_string())
        }
    }
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}

/// Parse error for control responses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Response too short: expected {expected} bytes, got {got}")]
    TooShort { expected: usize, got: usize },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: u8 },
}

/// A setting value outside the range the device accepts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("{field} must be {min}-{max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u8,
        max: u8,
    },
}
