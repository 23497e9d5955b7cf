//! Command handlers for the CLI application.
//!
//! - `query`: read-only commands (list, status, get, keymap)
//! - `set`: attribute writes
//! - `run`: the long-running driver loop

pub mod query;
pub mod run;
pub mod set;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use k90_keyboard::{Driver, InterfaceId};
use k90_transport::{
    BoxedTransport, DiscoveredDevice, MonitorTransport, UsbDiscovery, PRIMARY_INTERFACE,
};
use tracing::{info, warn};

use k90_driver::DriverConfig;

/// Driver with every interface of the first K90 attached
pub struct Session {
    pub device: DiscoveredDevice,
    pub driver: Driver<BoxedTransport>,
    pub primary: InterfaceId,
}

impl Session {
    /// Find the first K90, open its control channel and attach its interfaces
    ///
    /// With `monitor` set, every control request is logged.
    pub fn open(config: &DriverConfig, monitor: bool) -> Result<Self> {
        let (device, usb) = UsbDiscovery::new().open_first()?;
        let info = &device.info;
        info!(
            "Connected to keyboard: {} ({:04x}:{:04x}) at {}",
            info.product_name.as_deref().unwrap_or("Unknown"),
            info.vid,
            info.pid,
            info.bus_path()
        );

        let transport: BoxedTransport = if monitor {
            Arc::new(MonitorTransport::wrap(usb))
        } else {
            Arc::new(usb)
        };

        let mut driver = Driver::new(config.keymap());
        let mut interfaces = device.interfaces.clone();
        if !interfaces.contains(&PRIMARY_INTERFACE) {
            interfaces.insert(0, PRIMARY_INTERFACE);
        }
        for number in interfaces {
            let id = InterfaceId::new(info.bus_number, info.device_address, number);
            driver.attach(id, Arc::clone(&transport))?;
        }

        let primary = InterfaceId::new(info.bus_number, info.device_address, PRIMARY_INTERFACE);
        Ok(Self {
            device,
            driver,
            primary,
        })
    }

    /// Detach every bound interface
    pub fn close(mut self) {
        for id in self.driver.interfaces() {
            if let Err(e) = self.driver.detach(id) {
                warn!("{e}");
            }
        }
    }
}

/// Set up a Ctrl-C handler that sets the given flag to false when triggered.
/// Returns the Arc<AtomicBool> for use in the main loop.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}
