//! Service configuration with validation.
//!
//! Read once from the environment at startup; never re-read at runtime.

use std::collections::BTreeSet;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const ENV_TOKEN_PATH: &str = "ROBOT_API_TOKEN_PATH";
pub const ENV_ALLOWED_ORIGINS: &str = "ROBOT_API_ALLOWED_ORIGINS";
pub const ENV_HOST: &str = "ROBOT_API_HOST";
pub const ENV_PORT: &str = "ROBOT_API_PORT";
pub const ENV_WIFI_CONF_PATH: &str = "ROBOT_API_WIFI_CONF_PATH";
pub const ENV_SWITCH_CMD: &str = "ROBOT_API_SWITCH_CMD";
pub const ENV_MAX_BODY_BYTES: &str = "ROBOT_API_MAX_BODY_BYTES";

pub const DEFAULT_TOKEN_PATH: &str = "/var/lib/polyflow/api_token";
pub const DEFAULT_WIFI_CONF_PATH: &str = "/var/lib/polyflow/wifi.json";
pub const DEFAULT_SWITCH_CMD: &str = "/usr/local/bin/polyflow-wifi-switch";
pub const DEFAULT_PORT: u16 = 8082;
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

/// Main service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Where the bearer token lives (created on first start)
    pub token_path: PathBuf,
    /// Browser origins that get CORS headers (empty = CORS off)
    pub allowed_origins: AllowedOrigins,
    /// Bind address
    pub host: IpAddr,
    /// Listen port (default: 8082)
    pub port: u16,
    /// Wifi configuration artifact
    pub wifi_conf_path: PathBuf,
    /// Executable (and args) that applies the wifi artifact
    pub switch_command: SwitchCommand,
    /// Max request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            allowed_origins: AllowedOrigins::default(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            wifi_conf_path: PathBuf::from(DEFAULT_WIFI_CONF_PATH),
            switch_command: SwitchCommand {
                program: DEFAULT_SWITCH_CMD.to_string(),
                args: Vec::new(),
            },
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; set-but-invalid keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup(ENV_HOST) {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid(ENV_HOST, &raw, "expected an IP address"))?,
            None => defaults.host,
        };

        let port = match lookup(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid(ENV_PORT, &raw, "expected a port number"))?,
            None => defaults.port,
        };

        let max_body_bytes = match lookup(ENV_MAX_BODY_BYTES) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                ConfigError::invalid(ENV_MAX_BODY_BYTES, &raw, "expected a byte count")
            })?,
            None => defaults.max_body_bytes,
        };

        let switch_command = match lookup(ENV_SWITCH_CMD) {
            Some(raw) => SwitchCommand::parse(&raw).ok_or(ConfigError::EmptySwitchCommand)?,
            None => defaults.switch_command,
        };

        let config = Self {
            token_path: lookup(ENV_TOKEN_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            allowed_origins: AllowedOrigins::parse(lookup(ENV_ALLOWED_ORIGINS).as_deref()),
            host,
            port,
            wifi_conf_path: lookup(ENV_WIFI_CONF_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.wifi_conf_path),
            switch_command,
            max_body_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes cannot be 0".into(),
            ));
        }

        if self.token_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath(ENV_TOKEN_PATH));
        }

        if self.wifi_conf_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath(ENV_WIFI_CONF_PATH));
        }

        if self.switch_command.program.is_empty() {
            return Err(ConfigError::EmptySwitchCommand);
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Set of browser origins allowed cross-origin access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins(BTreeSet<String>);

impl AllowedOrigins {
    /// Parse a comma separated list. Blank entries are dropped.
    pub fn parse(raw: Option<&str>) -> Self {
        let origins = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        Self(origins)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// External switch executable plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SwitchCommand {
    /// Split a whitespace separated command line. `None` when blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid {key}={value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// A required path was empty
    #[error("{0} must not be empty")]
    EmptyPath(&'static str),
    /// Switch command line had no program
    #[error("{} must name an executable", ENV_SWITCH_CMD)]
    EmptySwitchCommand,
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: &'static str) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 8082);
        assert_eq!(config.token_path, PathBuf::from(DEFAULT_TOKEN_PATH));
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8082");
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (ENV_TOKEN_PATH, "/tmp/robot/token"),
            (ENV_PORT, "9000"),
            (ENV_HOST, "127.0.0.1"),
            (ENV_SWITCH_CMD, "/usr/bin/wifi-switch --apply  now"),
            (ENV_ALLOWED_ORIGINS, "http://console.local, ,http://10.42.0.1:3000"),
        ]))
        .unwrap();

        assert_eq!(config.token_path, PathBuf::from("/tmp/robot/token"));
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.switch_command.program, "/usr/bin/wifi-switch");
        assert_eq!(config.switch_command.args, vec!["--apply", "now"]);
        assert_eq!(config.allowed_origins.len(), 2);
        let origins: Vec<&str> = config.allowed_origins.iter().collect();
        assert_eq!(origins, vec!["http://10.42.0.1:3000", "http://console.local"]);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = ApiConfig::from_lookup(lookup_from(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: ENV_PORT, .. }
        ));
    }

    #[test]
    fn test_blank_switch_command_is_an_error() {
        let err = ApiConfig::from_lookup(lookup_from(&[(ENV_SWITCH_CMD, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptySwitchCommand);
    }

    #[test]
    fn test_zero_body_limit_is_an_error() {
        let err =
            ApiConfig::from_lookup(lookup_from(&[(ENV_MAX_BODY_BYTES, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimit(_)));
    }

    #[test]
    fn test_allowed_origins_parsing() {
        assert!(AllowedOrigins::parse(None).is_empty());
        assert!(AllowedOrigins::parse(Some("")).is_empty());
        assert!(AllowedOrigins::parse(Some(" , ,")).is_empty());

        let origins = AllowedOrigins::parse(Some("http://a, http://b ,http://a"));
        assert_eq!(origins.len(), 2);
        assert_eq!(origins.iter().collect::<Vec<_>>(), vec!["http://a", "http://b"]);
    }
}
