//! In-memory and spy implementations of the outbound ports.
//!
//! Used by unit tests, the router tests under `tests/`, and anyone embedding
//! the service without touching the host.

use crate::domain::error::{PersistenceError, TriggerError};
use crate::domain::types::{LoadAverage, SystemStats, WifiConfig};
use crate::ports::{StatsCollector, SwitchTrigger, WifiConfigStore};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Wifi store backed by a mutex; can be told to fail writes.
#[derive(Default)]
pub struct InMemoryWifiConfigStore {
    record: Mutex<Option<WifiConfig>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryWifiConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(config: WifiConfig) -> Self {
        let store = Self::default();
        *store.record.lock() = Some(config);
        store
    }

    /// Make every subsequent write/clear fail with a permission error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful writes and clears so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io {
                path: PathBuf::from("memory://wifi"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        Ok(())
    }
}

impl WifiConfigStore for InMemoryWifiConfigStore {
    fn write(&self, config: &WifiConfig) -> Result<(), PersistenceError> {
        self.check_writable()?;
        *self.record.lock() = Some(config.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.check_writable()?;
        *self.record.lock() = None;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self) -> Result<Option<WifiConfig>, PersistenceError> {
        Ok(self.record.lock().clone())
    }
}

/// Trigger that records invocations and optionally fails with an exit code.
#[derive(Default)]
pub struct SpySwitchTrigger {
    calls: AtomicUsize,
    fail_with: Mutex<Option<i32>>,
}

impl SpySwitchTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trigger that always exits with `code`.
    pub fn failing(code: i32) -> Self {
        let spy = Self::default();
        *spy.fail_with.lock() = Some(code);
        spy
    }

    pub fn set_failure(&self, code: Option<i32>) {
        *self.fail_with.lock() = code;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SwitchTrigger for SpySwitchTrigger {
    fn trigger(&self) -> Result<(), TriggerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.fail_with.lock() {
            Some(code) => Err(TriggerError::NonZeroExit {
                program: "spy-switch".to_string(),
                code: Some(code),
                stderr: "simulated failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Returns the same snapshot every time.
pub struct FixedStatsCollector(pub SystemStats);

impl Default for FixedStatsCollector {
    fn default() -> Self {
        Self(SystemStats {
            hostname: Some("robot-test".to_string()),
            uptime_secs: 3600,
            load_average: LoadAverage {
                one: 0.5,
                five: 0.25,
                fifteen: 0.125,
            },
            cpu_percent: 12.5,
            cpu_count: 4,
            memory_total_bytes: 4 * 1024 * 1024 * 1024,
            memory_used_bytes: 1024 * 1024 * 1024,
            memory_percent: 25.0,
            disk_total_bytes: 32 * 1024 * 1024 * 1024,
            disk_available_bytes: 16 * 1024 * 1024 * 1024,
            disk_percent: 50.0,
            temperature_celsius: Some(48.0),
        })
    }
}

impl StatsCollector for FixedStatsCollector {
    fn snapshot(&self) -> SystemStats {
        self.0.clone()
    }
}
