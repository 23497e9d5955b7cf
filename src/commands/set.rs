//! Setting command handlers.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::Session;
use k90_driver::DriverConfig;

/// Write one attribute and print the new value
pub fn set(config: &DriverConfig, monitor: bool, attr: &str, value: &str) -> Result<()> {
    let session = Session::open(config, monitor)?;
    let written = session.driver.store(session.primary, attr, value)?;
    info!("{attr}: accepted {written} bytes");
    print!("{attr}: {}", session.driver.show(session.primary, attr)?);
    session.close();
    Ok(())
}

/// Pin the effective G-key table into the config file
pub fn save_keymap(config: &DriverConfig, path: &Path) -> Result<()> {
    let pinned = config.with_pinned_keymap();
    pinned.save(path)?;
    println!("Saved G-key table to {}", path.display());
    Ok(())
}
