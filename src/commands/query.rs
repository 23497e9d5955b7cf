//! Query (read-only) command handlers.

use anyhow::Result;
use k90_keyboard::{Attribute, StateSource};
use k90_transport::UsbDiscovery;

use super::Session;
use k90_driver::DriverConfig;

/// List connected K90 keyboards
pub fn list() -> Result<()> {
    let devices = UsbDiscovery::new().list_devices()?;
    if devices.is_empty() {
        println!("No K90 keyboards found");
        return Ok(());
    }

    for device in &devices {
        let info = &device.info;
        println!(
            "{}  {:04x}:{:04x}  {}  interfaces={:?}",
            info.bus_path(),
            info.vid,
            info.pid,
            info.product_name.as_deref().unwrap_or("Unknown"),
            device.interfaces
        );
        if let Some(serial) = &info.serial {
            println!("    serial: {serial}");
        }
    }
    Ok(())
}

/// Print every attribute of the first keyboard
pub fn status(config: &DriverConfig, monitor: bool) -> Result<()> {
    let session = Session::open(config, monitor)?;
    let device = session.driver.device(session.primary)?;

    println!("K90 {}", session.device.info.bus_path());
    if device.state_source() == StateSource::Defaults {
        println!("  (status query failed, showing defaults)");
    }
    for attr in Attribute::ALL {
        print!("  {:<16} {}", attr.name(), session.driver.show(session.primary, attr.name())?);
    }

    session.close();
    Ok(())
}

/// Print one attribute
pub fn get(config: &DriverConfig, monitor: bool, attr: &str) -> Result<()> {
    let session = Session::open(config, monitor)?;
    print!("{}", session.driver.show(session.primary, attr)?);
    session.close();
    Ok(())
}

/// Print the effective G-key table
pub fn keymap(config: &DriverConfig) -> Result<()> {
    let source = if config.gkey_codes.is_some() {
        "config"
    } else {
        "default"
    };
    println!("G-key table ({source}):");
    for (gkey, code) in config.keymap().iter() {
        println!("  {:<4} -> {:>3} (0x{:03x})", gkey.to_string(), code, code);
    }
    Ok(())
}
