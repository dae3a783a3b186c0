//! Ports for the robot API.

pub mod outbound;

pub use outbound::{StatsCollector, SwitchTrigger, WifiConfigStore};
