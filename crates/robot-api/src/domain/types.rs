//! Core data types exchanged over the HTTP surface and with the ports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest SSID 802.11 allows, in bytes.
pub const MAX_SSID_BYTES: usize = 32;

/// Longest pre-shared key accepted (63 passphrase chars or 64 hex digits).
pub const MAX_PSK_CHARS: usize = 64;

/// Persisted wifi configuration record.
///
/// SSID and PSK are always present together; clearing removes the record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: String,
    pub psk: String,
}

impl WifiConfig {
    pub fn new(ssid: impl Into<String>, psk: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            psk: psk.into(),
        }
    }
}

impl fmt::Debug for WifiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiConfig")
            .field("ssid", &self.ssid)
            .field("psk", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /wifi`.
#[derive(Clone, Deserialize)]
pub struct WifiRequest {
    pub ssid: String,
    pub psk: String,
}

impl WifiRequest {
    /// Check field bounds and convert into the persisted record.
    pub fn into_config(self) -> Result<WifiConfig, String> {
        if self.ssid.is_empty() {
            return Err("ssid must not be empty".to_string());
        }
        if self.ssid.len() > MAX_SSID_BYTES {
            return Err(format!("ssid exceeds {} bytes", MAX_SSID_BYTES));
        }
        if self.psk.chars().count() > MAX_PSK_CHARS {
            return Err(format!("psk exceeds {} characters", MAX_PSK_CHARS));
        }
        Ok(WifiConfig::new(self.ssid, self.psk))
    }
}

/// Response of `GET /wifi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiStatus {
    pub ssid: Option<String>,
    pub psk: Option<String>,
    pub configured: bool,
}

impl From<Option<WifiConfig>> for WifiStatus {
    fn from(config: Option<WifiConfig>) -> Self {
        match config {
            Some(WifiConfig { ssid, psk }) => Self {
                ssid: Some(ssid),
                psk: Some(psk),
                configured: true,
            },
            None => Self {
                ssid: None,
                psk: None,
                configured: false,
            },
        }
    }
}

/// Generic `{"status": "ok"}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Point-in-time host statistics returned by `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub hostname: Option<String>,
    pub uptime_secs: u64,
    pub load_average: LoadAverage,
    /// Global CPU usage in percent (0-100)
    pub cpu_percent: f32,
    pub cpu_count: usize,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub memory_percent: f32,
    pub disk_total_bytes: u64,
    pub disk_available_bytes: u64,
    pub disk_percent: f32,
    /// Hottest sensor reading in Celsius, when the platform exposes any
    pub temperature_celsius: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64 * 100.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wifi_config_debug_redacts_psk() {
        let config = WifiConfig::new("lab-net", "hunter22");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("lab-net"));
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn test_request_validation() {
        let ok = WifiRequest {
            ssid: "lab-net".into(),
            psk: "hunter22".into(),
        };
        assert_eq!(ok.into_config().unwrap(), WifiConfig::new("lab-net", "hunter22"));

        let empty = WifiRequest {
            ssid: String::new(),
            psk: "x".into(),
        };
        assert!(empty.into_config().is_err());

        let long_ssid = WifiRequest {
            ssid: "s".repeat(MAX_SSID_BYTES + 1),
            psk: String::new(),
        };
        assert!(long_ssid.into_config().is_err());

        let long_psk = WifiRequest {
            ssid: "lab".into(),
            psk: "p".repeat(MAX_PSK_CHARS + 1),
        };
        assert!(long_psk.into_config().is_err());
    }

    #[test]
    fn test_open_network_psk_allowed() {
        let open = WifiRequest {
            ssid: "guest".into(),
            psk: String::new(),
        };
        assert!(open.into_config().is_ok());
    }

    #[test]
    fn test_status_from_record() {
        let status = WifiStatus::from(Some(WifiConfig::new("a", "b")));
        assert!(status.configured);
        assert_eq!(status.ssid.as_deref(), Some("a"));

        let empty = WifiStatus::from(None);
        assert!(!empty.configured);
        assert!(empty.ssid.is_none() && empty.psk.is_none());
    }

    #[test]
    fn test_status_response_shape() {
        let json = serde_json::to_value(StatusResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(50, 200), 25.0);
    }
}
