//! Error types for the robot API.
//!
//! `ApiError` is the single HTTP-facing error; everything else is a typed
//! failure of one component that gets mapped onto it at the handler edge.

use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Machine readable reason codes carried in the `error` field.
pub mod codes {
    pub const MISSING_TOKEN: &str = "missing_token";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const PERSISTENCE_FAILED: &str = "persistence_failed";
    pub const TRIGGER_FAILED: &str = "trigger_failed";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// HTTP-facing error: status, reason code and operator-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    #[serde(rename = "error")]
    pub code: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: u16, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    /// No bearer token, or a header without the `Bearer ` scheme
    pub fn missing_token() -> Self {
        Self::new(401, codes::MISSING_TOKEN, "missing bearer token")
    }

    /// Bearer token present but wrong
    pub fn invalid_token() -> Self {
        Self::new(403, codes::INVALID_TOKEN, "invalid token")
    }

    /// Request body failed validation
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(422, codes::INVALID_REQUEST, details)
    }

    /// Config artifact could not be written; nothing changed
    pub fn persistence_failed(details: impl fmt::Display) -> Self {
        Self::new(
            500,
            codes::PERSISTENCE_FAILED,
            format!("wifi config write failed: {}", details),
        )
    }

    /// Config written but the switch did not apply it
    pub fn trigger_failed(details: impl fmt::Display) -> Self {
        Self::new(
            500,
            codes::TRIGGER_FAILED,
            format!("wifi switch failed: {}", details),
        )
    }

    pub fn internal(details: impl fmt::Display) -> Self {
        Self::new(
            500,
            codes::INTERNAL_ERROR,
            format!("internal error: {}", details),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.status, self.code, self.detail)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Token store failures. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("cannot create token directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write token file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read token file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Wifi config artifact failures.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode wifi config: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("corrupt wifi config at {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Switch trigger failures.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The executable could not be started at all
    #[error("cannot launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The executable ran and reported failure
    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Outcome of a failed set/clear.
///
/// The variant tells the caller whether the artifact changed.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// Nothing changed; the trigger was not attempted
    #[error("persistence failed: {0}")]
    PersistenceFailed(#[source] PersistenceError),

    /// The artifact changed but the running subsystem was not switched
    #[error("trigger failed after config write: {0}")]
    TriggerFailed(#[source] TriggerError),
}

impl CoordinatorError {
    /// True when the config on disk already reflects the request.
    pub fn config_changed(&self) -> bool {
        matches!(self, CoordinatorError::TriggerFailed(_))
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(e: CoordinatorError) -> Self {
        match e {
            CoordinatorError::PersistenceFailed(inner) => ApiError::persistence_failed(inner),
            CoordinatorError::TriggerFailed(inner) => ApiError::trigger_failed(inner),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(e: PersistenceError) -> Self {
        ApiError::new(500, codes::PERSISTENCE_FAILED, e.to_string())
    }
}

/// Service-level errors (startup and serving, not per request)
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(ApiError::missing_token().status, 401);
        assert_eq!(ApiError::missing_token().code, codes::MISSING_TOKEN);
        assert_eq!(ApiError::invalid_token().status, 403);
        assert_eq!(ApiError::invalid_token().code, codes::INVALID_TOKEN);
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(ApiError::invalid_token()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "invalid_token", "detail": "invalid token"})
        );
    }

    #[test]
    fn test_trigger_failure_maps_to_500_with_detail() {
        let err = CoordinatorError::TriggerFailed(TriggerError::NonZeroExit {
            program: "wifi-switch".into(),
            code: Some(3),
            stderr: "nmcli: no such device".into(),
        });
        assert!(err.config_changed());

        let api: ApiError = err.into();
        assert_eq!(api.status, 500);
        assert_eq!(api.code, codes::TRIGGER_FAILED);
        assert!(api.detail.starts_with("wifi switch failed:"));
        assert!(api.detail.contains("status 3"));
        assert!(api.detail.contains("no such device"));
    }

    #[test]
    fn test_persistence_failure_is_distinct() {
        let err = CoordinatorError::PersistenceFailed(PersistenceError::Io {
            path: PathBuf::from("/ro/wifi.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(!err.config_changed());

        let api: ApiError = err.into();
        assert_eq!(api.status, 500);
        assert_eq!(api.code, codes::PERSISTENCE_FAILED);
        assert!(api.detail.contains("/ro/wifi.json"));
    }

    #[test]
    fn test_signal_exit_label() {
        let err = TriggerError::NonZeroExit {
            program: "wifi-switch".into(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
