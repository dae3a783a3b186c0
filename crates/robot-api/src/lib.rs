//! Robot API - local control-plane HTTP endpoint for a robot.
//!
//! Lets a fleet manager or on-robot UI read and change the robot's wifi
//! configuration and read health/telemetry.
//!
//! # Architecture
//!
//! ```text
//!   Request
//!      │
//!   CORS (only when ROBOT_API_ALLOWED_ORIGINS is set)
//!      │
//!   Tracing ── one span per request
//!      │
//!   Auth ───── authorize(path, peer, header, token)
//!      │         /health → allow
//!      │         trusted peer → allow
//!      │         no bearer → 401, wrong bearer → 403
//!      │
//!   Handlers ── /health  /wifi  /wifi/clear  /stats
//!      │
//!   WifiCoordinator ── persist, then switch
//!      │                    │
//!   WifiConfigStore    SwitchTrigger
//! ```
//!
//! # Trust model
//!
//! Peers on loopback, RFC1918 and IPv6 unique-local/link-local ranges are
//! admitted without a token. Everyone else must present
//! `Authorization: Bearer <token>`, where the token is read from (or created
//! at) `ROBOT_API_TOKEN_PATH` on startup.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod service;
pub mod test_utils;

// Re-exports for public API
pub use adapters::load_or_create;
pub use domain::access::{authorize, AccessDecision, AllowReason, RejectReason};
pub use domain::config::ApiConfig;
pub use domain::error::{ApiError, ApiResult, CoordinatorError, ServiceError};
pub use domain::token::ApiToken;
pub use domain::trust::is_trusted;
pub use service::{ApiService, AppState, WifiCoordinator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
