//! Corsair Vengeance K90 userspace driver
//!
//! Glue between the keyboard crates and the host: configuration, the uinput
//! device that carries G-key events, and the line-based control surface.

pub mod config;
pub mod control;
pub mod virtual_keys;

pub use config::{ConfigError, DriverConfig, InputConfig};
pub use control::{handle_line, ControlRequest};
pub use virtual_keys::{VirtualKeyboard, VirtualKeysError};
