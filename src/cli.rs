// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "k90_driver")]
#[command(author, version, about = "Corsair Vengeance K90 userspace driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/k90/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Enable transport monitoring (logs every control request)
    #[arg(long, global = true)]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected K90 keyboards
    #[command(visible_aliases = ["ls"])]
    List,

    /// Show all attributes
    #[command(visible_aliases = ["st"])]
    Status,

    /// Read one attribute (brightness, macro_mode, macro_record, current_profile)
    Get {
        /// Attribute name
        attr: String,
    },

    /// Write one attribute
    Set {
        /// Attribute name
        attr: String,
        /// New value (e.g. 2, HW, ON)
        value: String,
    },

    /// Print the effective G-key table
    Keymap {
        /// Write the table into the config file so it can be edited there
        #[arg(long)]
        save: bool,
    },

    /// Run the driver: forward G-keys, track device state, serve get/set on stdin
    Run,
}
