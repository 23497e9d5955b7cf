//! Protocol constants for K90 vendor control requests

/// Vendor bRequest codes
pub mod request {
    /// Set backlight level (wValue = 0-3)
    pub const BRIGHTNESS: u8 = 49;
    /// Shared by macro mode and macro-record LED; wValue tells them apart
    pub const MACRO_MODE: u8 = 2;
    /// Read the 8-byte status block (IN)
    pub const STATUS: u8 = 4;
    /// Select active profile (wValue = 1-3)
    pub const PROFILE: u8 = 20;

    /// Get human-readable name for a request code
    pub fn name(request: u8) -> &'static str {
        match request {
            BRIGHTNESS => "BRIGHTNESS",
            MACRO_MODE => "MACRO_MODE",
            STATUS => "STATUS",
            PROFILE => "PROFILE",
            _ => "UNKNOWN",
        }
    }
}

/// wValue arguments for `request::MACRO_MODE`
pub mod macro_mode {
    /// Macros played back by the host
    pub const SW: u16 = 0x0030;
    /// Macros played back by the keyboard firmware
    pub const HW: u16 = 0x0001;
}

/// wValue arguments for the macro-record LED (also `request::MACRO_MODE`)
pub mod macro_led {
    pub const ON: u16 = 0x0020;
    pub const OFF: u16 = 0x0040;
}

/// Layout of the `request::STATUS` reply
pub mod status {
    /// Reply length in bytes
    pub const LEN: usize = 8;
    /// Backlight level 0-3
    pub const BRIGHTNESS_OFFSET: usize = 4;
    /// Active profile 1-3
    pub const PROFILE_OFFSET: usize = 7;
}

/// wIndex used by every request
pub const INDEX: u16 = 0;

/// Timing constants
pub mod timing {
    /// Control transfer timeout (matches the kernel's USB_CTRL_SET_TIMEOUT)
    pub const CONTROL_TIMEOUT_MS: u64 = 5000;
}
