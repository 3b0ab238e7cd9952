//! Configuration file parsing for wslnet
//!
//! Parses an optional `wslnet.toml` using serde

use crate::address::{DottedQuad, DEFAULT_ADDRESS};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Config file looked up in the current directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "wslnet.toml";

/// Load configuration from a file
pub fn load(path: &Path) -> Result<WslnetConfig> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: WslnetConfig = toml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

/// Load the explicit config, or `wslnet.toml` if present, or defaults
pub fn load_or_default(explicit: Option<&Path>) -> Result<WslnetConfig> {
    if let Some(path) = explicit {
        return load(path);
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        tracing::debug!(path = %fallback.display(), "using config from current directory");
        load(fallback)
    } else {
        Ok(WslnetConfig::default())
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct WslnetConfig {
    /// Address used when none is given on the command line
    #[serde(default = "default_address")]
    pub default_address: String,

    /// How to reach the guest
    #[serde(default)]
    pub guest: GuestSettings,
}

impl Default for WslnetConfig {
    fn default() -> Self {
        Self {
            default_address: default_address(),
            guest: GuestSettings::default(),
        }
    }
}

impl WslnetConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        DottedQuad::parse(&self.default_address).map_err(|_| {
            Error::ConfigValidation(format!(
                "default_address '{}' is not a dotted quad",
                self.default_address
            ))
        })?;

        for (field, value) in [
            ("guest.host_process", &self.guest.host_process),
            ("guest.launcher", &self.guest.launcher),
            ("guest.interface", &self.guest.interface),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigValidation(format!("{} must not be empty", field)));
            }
        }

        if self.guest.interface.chars().any(char::is_whitespace) {
            return Err(Error::ConfigValidation(format!(
                "guest.interface '{}' contains whitespace",
                self.guest.interface
            )));
        }

        Ok(())
    }
}

/// Guest access settings
#[derive(Debug, Clone, Deserialize)]
pub struct GuestSettings {
    /// Host process whose presence means the guest is running
    #[serde(default = "default_host_process")]
    pub host_process: String,

    /// Command that runs things inside the guest
    #[serde(default = "default_launcher")]
    pub launcher: String,

    /// Guest interface receiving the address alias
    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for GuestSettings {
    fn default() -> Self {
        Self {
            host_process: default_host_process(),
            launcher: default_launcher(),
            interface: default_interface(),
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.into()
}

fn default_host_process() -> String {
    "wslhost.exe".into()
}

fn default_launcher() -> String {
    "wsl.exe".into()
}

fn default_interface() -> String {
    "eth0".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: WslnetConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_address, "192.168.222.222");
        assert_eq!(config.guest.host_process, "wslhost.exe");
        assert_eq!(config.guest.launcher, "wsl.exe");
        assert_eq!(config.guest.interface, "eth0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
default_address = "10.20.30.40"

[guest]
host_process = "vmmemWSL"
launcher = "C:\\Windows\\System32\\wsl.exe"
interface = "eth1"
"#;

        let config: WslnetConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_address, "10.20.30.40");
        assert_eq!(config.guest.host_process, "vmmemWSL");
        assert_eq!(config.guest.launcher, "C:\\Windows\\System32\\wsl.exe");
        assert_eq!(config.guest.interface, "eth1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_default_address() {
        let config: WslnetConfig = toml::from_str(r#"default_address = "10.20""#).unwrap();
        assert!(matches!(config.validate(), Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn test_empty_launcher() {
        let toml = r#"
[guest]
launcher = "  "
"#;
        let config: WslnetConfig = toml::from_str(toml).unwrap();
        assert!(matches!(config.validate(), Err(Error::ConfigValidation(_))));
    }

    #[test]
    fn test_interface_with_whitespace() {
        let toml = r#"
[guest]
interface = "eth0 up"
"#;
        let config: WslnetConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load(Path::new("/nonexistent/wslnet.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
