//! Device discovery for K90 keyboards

use hidapi::{HidApi, HidDevice};
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::usb_control::UsbControlTransport;

/// USB discovery for K90 keyboards
#[derive(Debug, Default)]
pub struct UsbDiscovery;

impl UsbDiscovery {
    pub fn new() -> Self {
        Self
    }

    /// List currently attached K90 keyboards
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let mut devices = Vec::new();

        for dev in nusb::list_devices()? {
            if !device_registry::is_k90(dev.vendor_id(), dev.product_id()) {
                continue;
            }

            let info = describe(&dev);
            let mut interfaces: Vec<u8> = dev.interfaces().map(|i| i.interface_number()).collect();
            interfaces.sort_unstable();
            interfaces.dedup();

            debug!(
                "Found device: VID={:04X} PID={:04X} path={} interfaces={:?}",
                info.vid,
                info.pid,
                info.bus_path(),
                interfaces
            );

            devices.push(DiscoveredDevice { info, interfaces });
        }

        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    /// Open the control transport for a discovered device
    pub fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<UsbControlTransport, TransportError> {
        let dev_info = nusb::list_devices()?
            .find(|d| {
                device_registry::is_k90(d.vendor_id(), d.product_id())
                    && d.bus_number() == device.info.bus_number
                    && d.device_address() == device.info.device_address
            })
            .ok_or_else(|| TransportError::DeviceNotFound(device.info.bus_path()))?;

        let usb_device = dev_info.open()?;
        info!(
            "Opened control transport for {:04X}:{:04X} at {}",
            device.info.vid,
            device.info.pid,
            device.info.bus_path()
        );
        Ok(UsbControlTransport::new(usb_device, device.info.clone()))
    }

    /// Open the first attached K90
    pub fn open_first(&self) -> Result<(DiscoveredDevice, UsbControlTransport), TransportError> {
        let device = self
            .list_devices()?
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::DeviceNotFound("No K90 keyboard found".into()))?;
        let transport = self.open_device(&device)?;
        Ok((device, transport))
    }
}

fn describe(dev: &nusb::DeviceInfo) -> TransportDeviceInfo {
    TransportDeviceInfo {
        vid: dev.vendor_id(),
        pid: dev.product_id(),
        bus_number: dev.bus_number(),
        device_address: dev.device_address(),
        serial: dev.serial_number().map(|s| s.to_string()),
        product_name: dev.product_string().map(|s| s.to_string()),
    }
}

/// Open the HID input interface of a K90 for raw input reports
///
/// # Arguments
/// * `api` - hidapi context
/// * `interface` - USB interface number to read from
pub fn open_input_device(api: &HidApi, interface: u8) -> Result<HidDevice, TransportError> {
    let info = api
        .device_list()
        .find(|d| {
            device_registry::is_k90(d.vendor_id(), d.product_id())
                && d.interface_number() == i32::from(interface)
        })
        .ok_or_else(|| {
            TransportError::DeviceNotFound(format!(
                "HID interface {} for {:04X}:{:04X}",
                interface,
                device_registry::VENDOR_ID,
                device_registry::PRODUCT_ID
            ))
        })?;

    debug!(
        "Opening HID input interface {} at {}",
        interface,
        info.path().to_string_lossy()
    );
    Ok(info.open_device(api)?)
}
