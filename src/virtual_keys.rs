//! Virtual keyboard carrying G-key events, via evdev/uinput

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};
use thiserror::Error;

/// Errors from virtual keyboard operations
#[derive(Debug, Error)]
pub enum VirtualKeysError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// uinput device that advertises every mapped G-key code
pub struct VirtualKeyboard {
    device: VirtualDevice,
}

impl VirtualKeyboard {
    /// Create the device and register the given key codes
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest`)
    /// * `codes` - Supported keys, normally `Driver::mapped_keys`
    pub fn new(name: &str, codes: &[u16]) -> Result<Self, VirtualKeysError> {
        let mut keys = AttributeSet::<Key>::new();
        for &code in codes {
            keys.insert(Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(VirtualKeysError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(VirtualKeysError::CreateDevice)?
            .build()
            .map_err(VirtualKeysError::CreateDevice)?;

        Ok(Self { device })
    }

    /// Emit a key press (true) or release (false)
    pub fn emit_key(&mut self, code: u16, pressed: bool) -> Result<(), VirtualKeysError> {
        let event = InputEvent::new_now(EventType::KEY, code, i32::from(pressed));
        self.device
            .emit(&[event])
            .map_err(VirtualKeysError::EmitEvent)
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}
