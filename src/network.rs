//! Host-side WSL network management
//!
//! Provides:
//! - The typed network settings document
//! - The host network service interface and handle guard
//! - Host Compute Network bindings (Windows only)

pub mod document;
pub mod service;

#[cfg(windows)]
mod ffi;
#[cfg(windows)]
pub mod hcn;

pub use document::NetworkDocument;
pub use service::{HostError, HostNetworkService, NetworkGuard, WSL_NETWORK_ID};

/// Host network service used for real runs
#[cfg(windows)]
pub type DefaultHost = hcn::HcnService;

/// Host network service used for real runs
#[cfg(not(windows))]
pub type DefaultHost = service::UnsupportedHost;
