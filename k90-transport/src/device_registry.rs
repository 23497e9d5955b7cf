//! Device registry - USB identity of supported keyboards

/// Corsair vendor ID
pub const VENDOR_ID: u16 = 0x1b1c;

/// Vengeance K90 product ID
pub const PRODUCT_ID: u16 = 0x1b02;

/// Interface number that carries device-wide state
///
/// The K90 enumerates several HID interfaces; only interface 0 answers the
/// status query and owns brightness/profile/macro state.
pub const PRIMARY_INTERFACE: u8 = 0;

/// Check if a VID/PID pair is a K90
#[inline]
pub fn is_k90(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && pid == PRODUCT_ID
}
