//! Adapters for the robot API.
//!
//! Infrastructure implementations of the outbound ports plus the token store
//! and HTTP error rendering.

pub mod atomic;
pub mod error_conversions;
pub mod stats;
pub mod switch;
pub mod token_store;
pub mod wifi_conf;

pub use stats::SysinfoStatsCollector;
pub use switch::CommandSwitchTrigger;
pub use token_store::load_or_create;
pub use wifi_conf::FileWifiConfigStore;
