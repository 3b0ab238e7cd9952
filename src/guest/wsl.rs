//! Guest access through the WSL launcher (`wsl.exe`)

use super::{process, GuestRuntime};
use crate::error::{Error, Result};
use crate::manifest::GuestSettings;
use std::process::Command;

/// Guest reached by running commands through the WSL launcher
#[derive(Debug, Clone)]
pub struct WslGuest {
    settings: GuestSettings,
}

impl WslGuest {
    pub fn new(settings: GuestSettings) -> Self {
        Self { settings }
    }

    /// Arguments for adding `cidr` to `interface` inside the guest
    fn add_address_args<'a>(cidr: &'a str, interface: &'a str) -> [&'a str; 7] {
        ["sudo", "ip", "a", "add", cidr, "dev", interface]
    }
}

impl GuestRuntime for WslGuest {
    fn host_pid(&self) -> Option<u32> {
        process::find_by_name(&self.settings.host_process)
    }

    fn list_addresses(&self) -> Result<String> {
        let output = Command::new(&self.settings.launcher)
            .args(["ip", "addr"])
            .output()
            .map_err(|e| {
                Error::ExternalCommandUnavailable(format!(
                    "{} ip addr: {}",
                    self.settings.launcher, e
                ))
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn add_address(&self, cidr: &str, interface: &str) -> Result<()> {
        let args = Self::add_address_args(cidr, interface);

        // Inherit stdio so sudo can prompt for a password
        let status = Command::new(&self.settings.launcher)
            .args(args)
            .status()
            .map_err(|e| Error::AliasAssignment(format!("{}: {}", self.settings.launcher, e)))?;

        if !status.success() {
            return Err(Error::AliasAssignment(format!(
                "'{} {}' exited with {}",
                self.settings.launcher,
                args.join(" "),
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest_with_launcher(launcher: &str) -> WslGuest {
        WslGuest::new(GuestSettings {
            launcher: launcher.to_string(),
            ..GuestSettings::default()
        })
    }

    #[test]
    fn test_add_address_args() {
        assert_eq!(
            WslGuest::add_address_args("10.0.5.7/24", "eth0").join(" "),
            "sudo ip a add 10.0.5.7/24 dev eth0"
        );
    }

    #[test]
    fn test_missing_launcher() {
        let guest = guest_with_launcher("wslnet-missing-launcher");

        let err = guest.list_addresses().unwrap_err();
        assert!(matches!(err, Error::ExternalCommandUnavailable(_)));

        let err = guest.add_address("10.0.5.7/24", "eth0").unwrap_err();
        assert!(matches!(err, Error::AliasAssignment(_)));
    }
}
