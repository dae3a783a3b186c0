//! # Robot Telemetry
//!
//! Structured logging bootstrap for the robot control-plane services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use robot_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | unset | Full filter directive, overrides the level below |
//! | `ROBOT_API_LOG_LEVEL` | `info` | Log level filter |
//! | `ROBOT_API_JSON_LOGS` | `true` in containers | JSON output |
//! | `ROBOT_API_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |
//! | `ROBOT_API_SERVICE_NAME` | `robot-api` | Service name in the startup record |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed (usually already set)
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Configuration could not be turned into a filter
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Must be called once, before any other component logs.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_logging(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::Config("bad".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
