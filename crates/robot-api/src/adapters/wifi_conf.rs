//! File-backed wifi configuration artifact.
//!
//! A small JSON document `{"ssid": ..., "psk": ...}`. Absence of the file
//! means "not configured".

use crate::adapters::atomic::write_atomic;
use crate::domain::error::PersistenceError;
use crate::domain::types::WifiConfig;
use crate::ports::WifiConfigStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The artifact holds a PSK; keep it owner-only.
const WIFI_FILE_MODE: u32 = 0o600;

pub struct FileWifiConfigStore {
    path: PathBuf,
}

impl FileWifiConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl WifiConfigStore for FileWifiConfigStore {
    fn write(&self, config: &WifiConfig) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let bytes = serde_json::to_vec_pretty(config).map_err(PersistenceError::Encode)?;
        write_atomic(&self.path, &bytes, Some(WIFI_FILE_MODE)).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), ssid = %config.ssid, "Wrote wifi config");
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed wifi config");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn read(&self) -> Result<Option<WifiConfig>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| PersistenceError::Decode {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileWifiConfigStore {
        FileWifiConfigStore::new(dir.path().join("conf").join("wifi.json"))
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let config = WifiConfig::new("lab-net", "correct horse");

        store.write(&config).unwrap();
        assert_eq!(store.read().unwrap(), Some(config));
    }

    #[test]
    fn test_write_replaces_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.write(&WifiConfig::new("old", "old-psk")).unwrap();
        store.write(&WifiConfig::new("new", "")).unwrap();
        assert_eq!(store.read().unwrap(), Some(WifiConfig::new("new", "")));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.clear().unwrap();
        store.write(&WifiConfig::new("a", "b")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_special_characters_survive() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let config = WifiConfig::new("café \"net\"", "p=a\nss#word");

        store.write(&config).unwrap();
        assert_eq!(store.read().unwrap(), Some(config));
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.read(), Err(PersistenceError::Decode { .. })));
    }

    #[test]
    fn test_unwritable_location_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let store = FileWifiConfigStore::new(blocker.join("wifi.json"));

        let err = store.write(&WifiConfig::new("a", "b")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
