//! Host statistics via `sysinfo`.

use crate::domain::types::{percent, LoadAverage, SystemStats};
use crate::ports::StatsCollector;
use std::path::Path;
use sysinfo::{Components, Disks, System};

/// Collects a fresh snapshot on every call.
///
/// Blocks for `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` to measure CPU usage.
#[derive(Default)]
pub struct SysinfoStatsCollector;

impl SysinfoStatsCollector {
    pub fn new() -> Self {
        Self
    }
}

impl StatsCollector for SysinfoStatsCollector {
    fn snapshot(&self) -> SystemStats {
        let mut sys = System::new();

        // CPU usage is a delta between two refreshes
        sys.refresh_cpu();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu();
        sys.refresh_memory();

        let memory_total_bytes = sys.total_memory();
        let memory_used_bytes = sys.used_memory();

        let (disk_total_bytes, disk_available_bytes) = root_disk_usage();

        let load = System::load_average();

        SystemStats {
            hostname: System::host_name(),
            uptime_secs: System::uptime(),
            load_average: LoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            cpu_percent: sys.global_cpu_info().cpu_usage(),
            cpu_count: sys.cpus().len(),
            memory_total_bytes,
            memory_used_bytes,
            memory_percent: percent(memory_used_bytes, memory_total_bytes),
            disk_total_bytes,
            disk_available_bytes,
            disk_percent: percent(
                disk_total_bytes.saturating_sub(disk_available_bytes),
                disk_total_bytes,
            ),
            temperature_celsius: max_temperature(),
        }
    }
}

/// (total, available) for the root filesystem, or the first disk listed.
fn root_disk_usage() -> (u64, u64) {
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().next())
        .map(|d| (d.total_space(), d.available_space()))
        .unwrap_or((0, 0))
}

fn max_temperature() -> Option<f32> {
    Components::new_with_refreshed_list()
        .iter()
        .map(|c| c.temperature())
        .filter(|t| t.is_finite())
        .reduce(f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_consistent() {
        let stats = SysinfoStatsCollector::new().snapshot();

        assert!(stats.cpu_count >= 1);
        assert!(stats.memory_total_bytes >= stats.memory_used_bytes);
        assert!((0.0..=100.0).contains(&stats.memory_percent));
        assert!(stats.disk_total_bytes >= stats.disk_available_bytes);
        assert!((0.0..=100.0).contains(&stats.disk_percent));
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = SysinfoStatsCollector::new().snapshot();
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("uptime_secs").is_some());
        assert!(json.get("load_average").is_some());
    }
}
