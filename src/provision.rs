//! WSL network (re)provisioning workflow
//!
//! Handles:
//! - Skipping everything when a running guest already holds the address
//! - Replacing the network bound to the WSL identity (close, delete, create)
//! - Adding the target address inside the guest as a best-effort final step

pub mod state;

use crate::address::DerivedBlock;
use crate::error::{Error, Result};
use crate::guest::{self, GuestRuntime};
use crate::network::{HostError, HostNetworkService, NetworkDocument, NetworkGuard, WSL_NETWORK_ID};
use state::NetworkLifecycle;

/// How the workflow ended
#[derive(Debug)]
pub enum Outcome {
    /// The running guest already holds the address; nothing was touched
    AlreadyConfigured,
    /// A new network was created
    Created {
        /// An existing network was deleted first
        replaced: bool,
        /// Result of adding the address inside the guest (never fatal)
        alias: Result<()>,
    },
}

/// Result of a successful provisioning run
#[derive(Debug)]
pub struct Report {
    pub block: DerivedBlock,
    /// PID of the guest host process when the run started
    pub guest_pid: Option<u32>,
    pub outcome: Outcome,
}

impl Report {
    /// The guest must be restarted to pick up a replaced network
    pub fn needs_guest_restart(&self) -> bool {
        self.guest_pid.is_some() && matches!(self.outcome, Outcome::Created { .. })
    }
}

/// Drives the provisioning workflow against a host and a guest
pub struct Provisioner<'a, H: HostNetworkService, G: GuestRuntime> {
    host: &'a H,
    guest: &'a G,
    /// Guest interface receiving the address alias
    interface: String,
}

impl<'a, H: HostNetworkService, G: GuestRuntime> Provisioner<'a, H, G> {
    pub fn new(host: &'a H, guest: &'a G, interface: impl Into<String>) -> Self {
        Self {
            host,
            guest,
            interface: interface.into(),
        }
    }

    /// Parse `input` (or `default` when empty) and provision for it
    pub fn provision(&self, input: &str, default: &str) -> Result<Report> {
        let block = DerivedBlock::resolve(input, default)?;
        self.run(block)
    }

    /// Provision the network for `block`
    pub fn run(&self, block: DerivedBlock) -> Result<Report> {
        let mut lifecycle = NetworkLifecycle::new();

        let guest_pid = self.guest.host_pid();
        tracing::debug!(?guest_pid, "guest host process");

        if guest_pid.is_some() && self.address_active(&block) {
            lifecycle.satisfied()?;
            println!("WSL address {} already set", block.address);
            return Ok(Report {
                block,
                guest_pid,
                outcome: Outcome::AlreadyConfigured,
            });
        }

        let replaced = self.remove_existing(&mut lifecycle)?;
        self.create(&mut lifecycle, &block)?;

        let alias = self.guest.add_address(&block.alias_cidr(), &self.interface);
        if let Err(ref e) = alias {
            tracing::warn!(error = %e, "address alias not applied");
        }

        tracing::debug!(state = ?lifecycle.state(), "provisioning finished");
        debug_assert!(lifecycle.state().is_terminal());

        Ok(Report {
            block,
            guest_pid,
            outcome: Outcome::Created { replaced, alias },
        })
    }

    /// Check the running guest for the target address
    fn address_active(&self, block: &DerivedBlock) -> bool {
        match self.guest.list_addresses() {
            Ok(listing) => guest::address_present(&listing, &block.address.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "cannot list guest addresses, assuming address is absent");
                false
            }
        }
    }

    /// Close and delete the network bound to the identity, if any
    ///
    /// Returns whether a network was deleted.
    fn remove_existing(&self, lifecycle: &mut NetworkLifecycle) -> Result<bool> {
        tracing::debug!(id = %WSL_NETWORK_ID, "opening network");

        let network = match self.host.open_network(&WSL_NETWORK_ID) {
            Ok(handle) => NetworkGuard::new(self.host, handle),
            Err(HostError::NotFound(msg)) => {
                tracing::debug!(%msg, "no existing network");
                lifecycle.missing()?;
                return Ok(false);
            }
            Err(HostError::Failed(msg)) => {
                lifecycle.fail()?;
                return Err(Error::IdentityLookup(msg));
            }
        };
        lifecycle.found()?;

        if let Err(e) = network.close() {
            lifecycle.fail()?;
            return Err(Error::Deletion(e.to_string()));
        }

        if let Err(e) = self.host.delete_network(&WSL_NETWORK_ID) {
            lifecycle.fail()?;
            return Err(Error::Deletion(e.to_string()));
        }
        lifecycle.deleted()?;
        println!("Existing WSL network deleted");

        Ok(true)
    }

    /// Create the network for `block` under the identity
    fn create(&self, lifecycle: &mut NetworkLifecycle, block: &DerivedBlock) -> Result<()> {
        let settings = NetworkDocument::for_block(block).to_json()?;
        tracing::debug!(%settings, "creating network");

        match self.host.create_network(&WSL_NETWORK_ID, &settings) {
            Ok(handle) => {
                let _network = NetworkGuard::new(self.host, handle);
                lifecycle.created()?;
                println!("WSL network created");
                Ok(())
            }
            Err(e) => {
                lifecycle.fail()?;
                Err(Error::Creation(e.to_string()))
            }
        }
    }
}
