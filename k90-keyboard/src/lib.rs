//! Device state and usage semantics for the Corsair Vengeance K90
//!
//! This crate sits on top of any `ControlTransport`: it classifies input
//! usages, keeps the cached device state in sync with the keyboard, and
//! exposes the four text attributes used to drive it.

pub mod attributes;
pub mod device;
pub mod driver;
pub mod error;
pub mod keymap;
pub mod state;
pub mod usage;

pub use attributes::Attribute;
pub use device::{K90Device, StateSource};
pub use driver::{BoundInterface, Driver, EventDisposition, InputMapping, InterfaceId};
pub use error::KeyboardError;
pub use keymap::{KeyMap, DEFAULT_GKEY_CODES};
pub use state::{DeviceState, StateChange};
pub use usage::{classify, usage_to_gkey, GKey, Special, Usage, GKEY_COUNT};

// Re-export the value types callers need to drive a device
pub use k90_transport::{Brightness, MacroMode, Profile};
