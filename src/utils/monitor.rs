use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct ResourceStats {
    pub memory_usage_mb: Option<u64>,
    pub peak_memory_mb: Option<u64>,
    pub elapsed_time: Duration,
}

/// Tracks wall time and (with the `cli` feature) resident memory across the
/// read / convert / write phases of a job.
pub struct ResourceMonitor {
    #[cfg(feature = "cli")]
    system: System,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
    start_time: Instant,
    peak_memory_mb: u64,
    enabled: bool,
}

impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            #[cfg(feature = "cli")]
            system: System::new(),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
            start_time: Instant::now(),
            peak_memory_mb: 0,
            enabled,
        }
    }

    #[cfg(feature = "cli")]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.system
            .process(pid)
            .map(|process| process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory_mb(&mut self) -> Option<u64> {
        None
    }

    pub fn stats(&mut self) -> Option<ResourceStats> {
        if !self.enabled {
            return None;
        }

        let memory_usage_mb = self.sample_memory_mb();
        if let Some(memory) = memory_usage_mb {
            self.peak_memory_mb = self.peak_memory_mb.max(memory);
        }

        Some(ResourceStats {
            memory_usage_mb,
            peak_memory_mb: memory_usage_mb.map(|_| self.peak_memory_mb),
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&mut self, phase: &str) {
        if let Some(stats) = self.stats() {
            match stats.memory_usage_mb {
                Some(memory) => tracing::info!(
                    "📊 {} - Memory: {}MB, Peak: {}MB, Time: {:?}",
                    phase,
                    memory,
                    self.peak_memory_mb,
                    stats.elapsed_time
                ),
                None => tracing::info!("📊 {} - Time: {:?}", phase, stats.elapsed_time),
            }
        }
    }

    pub fn log_final_stats(&mut self) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed_time,
                self.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let mut monitor = ResourceMonitor::default();
        assert!(!monitor.is_enabled());
        assert!(monitor.stats().is_none());
    }

    #[test]
    fn test_enabled_monitor_tracks_elapsed_time() {
        let mut monitor = ResourceMonitor::new(true);
        let stats = monitor.stats().unwrap();
        assert!(stats.elapsed_time <= monitor.start_time.elapsed());
    }
}
