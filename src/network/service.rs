//! Host network service interface
//!
//! The host keeps one WSL network under a fixed GUID. Everything the
//! provisioning workflow does to it goes through [`HostNetworkService`].

use std::fmt;
use uuid::Uuid;

/// GUID of the network WSL attaches its virtual machine to
pub const WSL_NETWORK_ID: NetworkId = NetworkId(Uuid::from_u128(0xB95D0C5E_57D4_412B_B571_18A81A16E005));

/// Identity of a host network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkId(Uuid);

impl NetworkId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:X}}}", self.as_uuid())
    }
}

/// Failure reported by the host, carrying its message verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No network is registered under the requested identity
    #[cfg_attr(not(windows), allow(dead_code))]
    NotFound(String),
    /// Any other failure
    Failed(String),
}

impl HostError {
    pub fn message(&self) -> &str {
        match self {
            HostError::NotFound(msg) | HostError::Failed(msg) => msg,
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Operations consumed from the host network subsystem
pub trait HostNetworkService {
    /// Open handle to a network
    type Handle;

    fn open_network(&self, id: &NetworkId) -> Result<Self::Handle, HostError>;

    fn close_network(&self, handle: Self::Handle) -> Result<(), HostError>;

    fn delete_network(&self, id: &NetworkId) -> Result<(), HostError>;

    /// Create a network from a JSON settings document
    fn create_network(&self, id: &NetworkId, settings: &str) -> Result<Self::Handle, HostError>;
}

/// Open network handle, closed on drop unless closed explicitly
pub struct NetworkGuard<'a, S: HostNetworkService> {
    service: &'a S,
    handle: Option<S::Handle>,
}

impl<'a, S: HostNetworkService> NetworkGuard<'a, S> {
    pub fn new(service: &'a S, handle: S::Handle) -> Self {
        Self {
            service,
            handle: Some(handle),
        }
    }

    /// Close the handle now and report the result
    pub fn close(mut self) -> Result<(), HostError> {
        match self.handle.take() {
            Some(handle) => self.service.close_network(handle),
            None => Ok(()),
        }
    }
}

impl<S: HostNetworkService> Drop for NetworkGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.service.close_network(handle) {
                tracing::warn!(error = %e, "failed to close network handle");
            }
        }
    }
}

/// Stand-in on hosts without the Host Compute Network API
#[derive(Debug, Default)]
#[cfg_attr(windows, allow(dead_code))]
pub struct UnsupportedHost;

const UNSUPPORTED: &str = "the Host Compute Network API is only available on Windows";

impl HostNetworkService for UnsupportedHost {
    type Handle = ();

    fn open_network(&self, _id: &NetworkId) -> Result<(), HostError> {
        Err(HostError::Failed(UNSUPPORTED.to_string()))
    }

    fn close_network(&self, _handle: ()) -> Result<(), HostError> {
        Ok(())
    }

    fn delete_network(&self, _id: &NetworkId) -> Result<(), HostError> {
        Err(HostError::Failed(UNSUPPORTED.to_string()))
    }

    fn create_network(&self, _id: &NetworkId, _settings: &str) -> Result<(), HostError> {
        Err(HostError::Failed(UNSUPPORTED.to_string()))
    }
}
