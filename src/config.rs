//! Driver configuration
//!
//! Stored as TOML. A missing file means defaults; a present but invalid file
//! is an error.

use std::path::{Path, PathBuf};

use k90_keyboard::KeyMap;
use k90_transport::EventReaderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Raw input settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Report ID to strip before decoding, if the keyboard interface uses one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<u8>,
    /// Reader wake-up period in milliseconds
    pub read_timeout_ms: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            report_id: None,
            read_timeout_ms: 50,
        }
    }
}

/// Top-level config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Replacement G-key table (exactly 18 key codes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gkey_codes: Option<KeyMap>,

    /// Name of the uinput device carrying G-key events
    #[serde(default = "default_virtual_device_name")]
    pub virtual_device_name: String,

    #[serde(default)]
    pub input: InputConfig,
}

fn default_virtual_device_name() -> String {
    "K90 Macro Keys".to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            gkey_codes: None,
            virtual_device_name: default_virtual_device_name(),
            input: InputConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("k90")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }

    /// Effective G-key table
    pub fn keymap(&self) -> KeyMap {
        self.gkey_codes.clone().unwrap_or_default()
    }

    /// Copy of this config with the effective table written out explicitly
    pub fn with_pinned_keymap(&self) -> Self {
        Self {
            gkey_codes: Some(self.keymap()),
            ..self.clone()
        }
    }

    /// Event reader settings derived from `[input]`
    pub fn reader_config(&self) -> EventReaderConfig {
        EventReaderConfig {
            read_timeout_ms: self.input.read_timeout_ms,
            report_id: self.input.report_id,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k90_keyboard::DEFAULT_GKEY_CODES;

    #[test]
    fn test_empty_file_is_default() {
        let config: DriverConfig = toml::from_str("").unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.keymap().codes(), &DEFAULT_GKEY_CODES);
        assert_eq!(config.virtual_device_name, "K90 Macro Keys");
        assert_eq!(config.input.read_timeout_ms, 50);
    }

    #[test]
    fn test_gkey_override() {
        let codes: Vec<String> = (30..48).map(|c| c.to_string()).collect();
        let toml_str = format!("gkey_codes = [{}]", codes.join(", "));
        let config: DriverConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.keymap().get(1), Some(30));
        assert_eq!(config.keymap().get(18), Some(47));
    }

    #[test]
    fn test_short_gkey_table_rejected() {
        let result: Result<DriverConfig, _> = toml::from_str("gkey_codes = [183, 184]");
        assert!(result.is_err());
    }

    #[test]
    fn test_input_section() {
        let config: DriverConfig = toml::from_str(
            r#"
virtual_device_name = "Macro pad"

[input]
report_id = 1
read_timeout_ms = 20
"#,
        )
        .unwrap();
        assert_eq!(config.virtual_device_name, "Macro pad");
        let reader = config.reader_config();
        assert_eq!(reader.report_id, Some(1));
        assert_eq!(reader.read_timeout_ms, 20);
    }

    #[test]
    fn test_roundtrip() {
        let config = DriverConfig {
            gkey_codes: Some(KeyMap::default()),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: DriverConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_pinned_keymap_then_load() {
        let dir = std::env::temp_dir().join(format!("k90-config-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let config = DriverConfig {
            virtual_device_name: "Saved pad".into(),
            ..Default::default()
        };
        config.with_pinned_keymap().save(&path).unwrap();

        let loaded = DriverConfig::load(&path).unwrap();
        assert_eq!(loaded.gkey_codes, Some(KeyMap::default()));
        assert_eq!(loaded.virtual_device_name, "Saved pad");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let file = std::env::temp_dir().join(format!("k90-config-blocker-{}", std::process::id()));
        std::fs::write(&file, "").unwrap();

        let err = DriverConfig::default()
            .save(&file.join("config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));

        std::fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("k90-config-test-does-not-exist.toml");
        assert_eq!(DriverConfig::load(&path).unwrap(), DriverConfig::default());
    }
}
