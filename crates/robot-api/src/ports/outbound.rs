//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the service needs from the host. All of them are blocking;
//! the HTTP layer runs them on the blocking pool.
//!
//! Production adapters live in `crate::adapters`; test doubles in
//! `crate::test_utils`.

use crate::domain::error::{PersistenceError, TriggerError};
use crate::domain::types::{SystemStats, WifiConfig};

/// Persistence of the wifi configuration artifact.
pub trait WifiConfigStore: Send + Sync {
    /// Replace any existing record with `config`. Never merges.
    fn write(&self, config: &WifiConfig) -> Result<(), PersistenceError>;

    /// Remove the record. Removing a missing record succeeds.
    fn clear(&self) -> Result<(), PersistenceError>;

    /// Current record, `None` when nothing is configured.
    fn read(&self) -> Result<Option<WifiConfig>, PersistenceError>;
}

/// Tells the running wifi subsystem to apply the persisted artifact.
pub trait SwitchTrigger: Send + Sync {
    /// Run to completion. No timeout.
    fn trigger(&self) -> Result<(), TriggerError>;
}

/// Read-only host statistics.
pub trait StatsCollector: Send + Sync {
    fn snapshot(&self) -> SystemStats;
}
