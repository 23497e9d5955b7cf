//! Keyboard interface error types

use k90_transport::{TransportError, ValueError};
use thiserror::Error;

use crate::driver::InterfaceId;

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error, passed through unchanged
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed or out-of-range caller input; nothing was sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Interface is attached but carries no device state
    #[error("Interface {0} has no device state")]
    NoState(InterfaceId),

    /// Interface was never attached (or already detached)
    #[error("Interface {0} is not attached")]
    NotAttached(InterfaceId),

    /// Interface is already bound
    #[error("Interface {0} is already attached")]
    AlreadyAttached(InterfaceId),

    /// G-key table override is unusable
    #[error("Invalid key map: {0}")]
    InvalidKeyMap(String),
}

impl From<ValueError> for KeyboardError {
    fn from(e: ValueError) -> Self {
        KeyboardError::InvalidParameter(e.to_string())
    }
}

impl KeyboardError {
    /// True for errors raised before any device I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}
