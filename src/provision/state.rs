//! Network lifecycle state machine
//!
//! Tracks what is known about the network bound to the WSL identity while
//! it is being replaced. Uses dynamic dispatch so the workflow can feed
//! events as host calls return.

use state_machines::state_machine;

state_machine! {
    name: NetworkMachine,
    dynamic: true,
    initial: Unknown,
    states: [Unknown, Absent, Present, Created, Idempotent, Failed],
    events {
        found {
            transition: { from: Unknown, to: Present }
        }
        missing {
            transition: { from: Unknown, to: Absent }
        }
        satisfied {
            transition: { from: Unknown, to: Idempotent }
        }
        deleted {
            transition: { from: Present, to: Absent }
        }
        created {
            transition: { from: Absent, to: Created }
        }
        fail {
            transition: { from: [Unknown, Present, Absent], to: Failed }
        }
    }
}

/// Lifecycle state for external use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Identity status not yet looked up
    Unknown,
    Absent,
    /// A network with old settings is bound to the identity
    Present,
    /// New network created
    Created,
    /// Address already active in the running guest
    Idempotent,
    Failed,
}

impl State {
    fn from_name(s: &str) -> Self {
        match s {
            "Absent" => State::Absent,
            "Present" => State::Present,
            "Created" => State::Created,
            "Idempotent" => State::Idempotent,
            "Failed" => State::Failed,
            _ => State::Unknown,
        }
    }

    /// True for states the workflow ends in
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Created | State::Idempotent | State::Failed)
    }
}

/// Lifecycle of the network bound to the WSL identity
pub struct NetworkLifecycle {
    machine: DynamicNetworkMachine<()>,
}

impl Default for NetworkLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkLifecycle {
    pub fn new() -> Self {
        Self {
            machine: NetworkMachine::new(()).into_dynamic(),
        }
    }

    pub fn state(&self) -> State {
        State::from_name(self.machine.current_state())
    }

    /// Lookup opened an existing network
    pub fn found(&mut self) -> crate::error::Result<()> {
        self.handle(NetworkMachineEvent::Found, "found")
    }

    /// Lookup reported no network
    pub fn missing(&mut self) -> crate::error::Result<()> {
        self.handle(NetworkMachineEvent::Missing, "missing")
    }

    /// Running guest already holds the address
    pub fn satisfied(&mut self) -> crate::error::Result<()> {
        self.handle(NetworkMachineEvent::Satisfied, "satisfied")
    }

    pub fn deleted(&mut self) -> crate::error::Result<()> {
        self.handle(NetworkMachineEvent::Deleted, "deleted")
    }

    pub fn created(&mut self) -> crate::error::Result<()> {
        self.handle(NetworkMachineEvent::Created, "created")
    }

    pub fn fail(&mut self) -> crate::error::Result<()> {
        self.handle(NetworkMachineEvent::Fail, "fail")
    }

    fn handle(&mut self, event: NetworkMachineEvent, name: &str) -> crate::error::Result<()> {
        let from = self.machine.current_state().to_string();
        self.machine.handle(event).map_err(|e| {
            crate::error::Error::Lifecycle(format!(
                "cannot apply '{}' in state {}: {:?}",
                name, from, e
            ))
        })?;
        tracing::debug!(event = name, %from, to = self.machine.current_state(), "network lifecycle");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_initial_state() {
        let lifecycle = NetworkLifecycle::new();
        assert_eq!(lifecycle.state(), State::Unknown);
        assert!(!lifecycle.state().is_terminal());
    }

    #[test]
    fn test_replace_existing() {
        let mut lifecycle = NetworkLifecycle::new();

        lifecycle.found().unwrap();
        assert_eq!(lifecycle.state(), State::Present);

        lifecycle.deleted().unwrap();
        assert_eq!(lifecycle.state(), State::Absent);

        lifecycle.created().unwrap();
        assert_eq!(lifecycle.state(), State::Created);
        assert!(lifecycle.state().is_terminal());
    }

    #[test]
    fn test_create_fresh() {
        let mut lifecycle = NetworkLifecycle::new();
        lifecycle.missing().unwrap();
        lifecycle.created().unwrap();
        assert_eq!(lifecycle.state(), State::Created);
    }

    #[test]
    fn test_short_circuit() {
        let mut lifecycle = NetworkLifecycle::new();
        lifecycle.satisfied().unwrap();
        assert_eq!(lifecycle.state(), State::Idempotent);
    }

    #[test]
    fn test_fail_from_present() {
        let mut lifecycle = NetworkLifecycle::new();
        lifecycle.found().unwrap();
        lifecycle.fail().unwrap();
        assert_eq!(lifecycle.state(), State::Failed);
    }

    #[test]
    fn test_create_requires_absent() {
        let mut lifecycle = NetworkLifecycle::new();
        lifecycle.found().unwrap();
        // Existing network must be deleted first
        assert!(matches!(lifecycle.created(), Err(Error::Lifecycle(_))));
        assert_eq!(lifecycle.state(), State::Present);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut lifecycle = NetworkLifecycle::new();
        lifecycle.satisfied().unwrap();
        assert!(lifecycle.fail().is_err());
        assert!(lifecycle.found().is_err());
    }
}
