//! Wifi mutation coordinator.
//!
//! Two phases per operation: persist, then switch. The switch only runs when
//! persistence succeeded, and each failure is reported as its own variant so
//! callers can tell "nothing changed" from "changed but not applied".

use crate::domain::error::{CoordinatorError, PersistenceError};
use crate::domain::types::WifiConfig;
use crate::ports::{SwitchTrigger, WifiConfigStore};
use std::sync::Arc;
use tracing::{error, info};

pub struct WifiCoordinator {
    store: Arc<dyn WifiConfigStore>,
    trigger: Arc<dyn SwitchTrigger>,
}

impl WifiCoordinator {
    pub fn new(store: Arc<dyn WifiConfigStore>, trigger: Arc<dyn SwitchTrigger>) -> Self {
        Self { store, trigger }
    }

    /// Replace the wifi record with `config`, then run the switch.
    pub fn apply_wifi(&self, config: &WifiConfig) -> Result<(), CoordinatorError> {
        self.store.write(config).map_err(|e| {
            error!(error = %e, "Wifi config write failed; switch not attempted");
            CoordinatorError::PersistenceFailed(e)
        })?;

        self.run_switch()?;
        info!(ssid = %config.ssid, "Wifi config applied");
        Ok(())
    }

    /// Remove the wifi record (no-op when absent), then run the switch.
    pub fn clear_wifi(&self) -> Result<(), CoordinatorError> {
        self.store.clear().map_err(|e| {
            error!(error = %e, "Wifi config clear failed; switch not attempted");
            CoordinatorError::PersistenceFailed(e)
        })?;

        self.run_switch()?;
        info!("Wifi config cleared");
        Ok(())
    }

    /// Latest persisted record.
    pub fn current(&self) -> Result<Option<WifiConfig>, PersistenceError> {
        self.store.read()
    }

    fn run_switch(&self) -> Result<(), CoordinatorError> {
        self.trigger.trigger().map_err(|e| {
            error!(error = %e, "Wifi switch failed after config change");
            CoordinatorError::TriggerFailed(e)
        })
    }
}
