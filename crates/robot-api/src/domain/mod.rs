//! Domain layer: pure types and decision logic, no I/O.

pub mod access;
pub mod config;
pub mod error;
pub mod token;
pub mod trust;
pub mod types;

pub use access::{authorize, AccessDecision, AllowReason, RejectReason};
pub use config::{AllowedOrigins, ApiConfig, ConfigError, SwitchCommand};
pub use error::{
    ApiError, ApiResult, CoordinatorError, PersistenceError, ServiceError, TokenStoreError,
    TriggerError,
};
pub use token::ApiToken;
pub use trust::is_trusted;
pub use types::{StatusResponse, SystemStats, WifiConfig, WifiRequest, WifiStatus};
