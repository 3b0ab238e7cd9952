//! Access to the WSL guest
//!
//! Provides:
//! - Detection of the running guest host process
//! - Listing the guest's current addresses
//! - Adding a secondary address inside the guest

pub mod process;
pub mod wsl;

pub use wsl::WslGuest;

use crate::error::Result;

/// Guest operations consumed by the provisioning workflow
pub trait GuestRuntime {
    /// PID of the guest host process, if the guest is running
    fn host_pid(&self) -> Option<u32>;

    /// Captured output of the guest's address listing
    fn list_addresses(&self) -> Result<String>;

    /// Add `cidr` as a secondary address on `interface` (best effort)
    fn add_address(&self, cidr: &str, interface: &str) -> Result<()>;
}

/// Check whether any line of an address listing contains `address`
pub fn address_present(listing: &str, address: &str) -> bool {
    listing.lines().any(|line| line.contains(address))
}
