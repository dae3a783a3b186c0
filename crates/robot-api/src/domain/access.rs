//! Per-request access decision.
//!
//! Decision order (first match wins):
//!
//! 1. `/health` (exact path) is always admitted
//! 2. Trusted peers are admitted without a token
//! 3. No `Bearer ` header -> reject, 401
//! 4. Token mismatch -> reject, 403
//! 5. Admit
//!
//! Pure function of its inputs so it can be exercised without a server.

use crate::domain::error::{codes, ApiError};
use crate::domain::token::constant_time_compare;
use crate::domain::trust::is_trusted;

/// Path that bypasses authentication entirely.
pub const HEALTH_PATH: &str = "/health";

/// Case-sensitive authorization scheme prefix.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No header, or a header without the bearer scheme
    MissingToken,
    /// Bearer token did not match
    InvalidToken,
}

impl RejectReason {
    /// HTTP status for this rejection.
    pub fn status(self) -> u16 {
        match self {
            RejectReason::MissingToken => 401,
            RejectReason::InvalidToken => 403,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RejectReason::MissingToken => codes::MISSING_TOKEN,
            RejectReason::InvalidToken => codes::INVALID_TOKEN,
        }
    }
}

impl From<RejectReason> for ApiError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::MissingToken => ApiError::missing_token(),
            RejectReason::InvalidToken => ApiError::invalid_token(),
        }
    }
}

/// Why a request was admitted. Useful for logging, not for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    HealthCheck,
    TrustedPeer,
    ValidToken,
}

/// Outcome of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(AllowReason),
    Reject(RejectReason),
}

/// Decide whether a request may reach its handler.
///
/// `auth_header` is the raw `Authorization` value, empty when absent.
/// `required_token` is compared exactly (after trimming the presented value)
/// in constant time.
pub fn authorize(
    request_path: &str,
    peer_address: &str,
    auth_header: &str,
    required_token: &str,
) -> AccessDecision {
    if request_path == HEALTH_PATH {
        return AccessDecision::Allow(AllowReason::HealthCheck);
    }

    if is_trusted(peer_address) {
        return AccessDecision::Allow(AllowReason::TrustedPeer);
    }

    let Some(presented) = auth_header.strip_prefix(BEARER_PREFIX) else {
        return AccessDecision::Reject(RejectReason::MissingToken);
    };

    if !constant_time_compare(presented.trim(), required_token) {
        return AccessDecision::Reject(RejectReason::InvalidToken);
    }

    AccessDecision::Allow(AllowReason::ValidToken)
}
