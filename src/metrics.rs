use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Agent runtime metrics, published with every heartbeat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metrics {
    pub uptime_sec: u64,
    pub analyses_total: u64,
    pub analyses_success: u64,
    pub analyses_failed: u64,
    pub memory_bytes: u64,
    pub custom: HashMap<String, f64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update memory usage from system
    pub fn update_memory(&mut self) {
        #[cfg(target_os = "linux")]
        {
            if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
                for line in status.lines() {
                    if line.starts_with("VmRSS:") {
                        if let Some(kb) = line.split_whitespace().nth(1) {
                            if let Ok(kb) = kb.parse::<u64>() {
                                self.memory_bytes = kb * 1024;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Record a successful analysis
    pub fn record_success(&mut self) {
        self.analyses_total += 1;
        self.analyses_success += 1;
    }

    /// Record a failed analysis
    pub fn record_failure(&mut self) {
        self.analyses_total += 1;
        self.analyses_failed += 1;
    }

    /// Set a custom metric
    #[allow(dead_code)]
    pub fn set_custom(&mut self, key: impl Into<String>, value: f64) {
        self.custom.insert(key.into(), value);
    }

    /// Get success rate as percentage
    pub fn success_rate(&self) -> f64 {
        if self.analyses_total == 0 {
            return 100.0;
        }
        (self.analyses_success as f64 / self.analyses_total as f64) * 100.0
    }

    /// Increment uptime (typically called every heartbeat interval)
    pub fn increment_uptime(&mut self, seconds: u64) {
        self.uptime_sec += seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.uptime_sec, 0);
        assert_eq!(metrics.analyses_total, 0);
        assert_eq!(metrics.analyses_success, 0);
        assert_eq!(metrics.analyses_failed, 0);
        assert!(metrics.custom.is_empty());
    }

    #[test]
    fn test_record_success() {
        let mut metrics = Metrics::new();
        metrics.record_success();
        assert_eq!(metrics.analyses_total, 1);
        assert_eq!(metrics.analyses_success, 1);
        assert_eq!(metrics.analyses_failed, 0);
    }

    #[test]
    fn test_record_failure() {
        let mut metrics = Metrics::new();
        metrics.record_failure();
        assert_eq!(metrics.analyses_total, 1);
        assert_eq!(metrics.analyses_failed, 1);
    }

    #[test]
    fn test_record_mixed() {
        let mut metrics = Metrics::new();
        metrics.record_success();
        metrics.record_success();
        metrics.record_failure();
        metrics.record_success();

        assert_eq!(metrics.analyses_total, 4);
        assert_eq!(metrics.analyses_success, 3);
        assert_eq!(metrics.analyses_failed, 1);
    }

    #[test]
    fn test_success_rate_zero_analyses() {
        let metrics = Metrics::new();
        assert_eq!(metrics.success_rate(), 100.0);
    }

    #[test]
    fn test_success_rate_mixed() {
        let mut metrics = Metrics::new();
        metrics.record_success();
        metrics.record_success();
        metrics.record_failure();
        metrics.record_success();
        assert_eq!(metrics.success_rate(), 75.0);
    }

    #[test]
    fn test_increment_uptime() {
        let mut metrics = Metrics::new();
        metrics.increment_uptime(30);
        metrics.increment_uptime(30);
        assert_eq!(metrics.uptime_sec, 60);
    }

    #[test]
    fn test_set_custom_metric() {
        let mut metrics = Metrics::new();
        metrics.set_custom("rpc_latency_ms", 42.5);
        metrics.set_custom("rpc_latency_ms", 50.0);
        assert_eq!(metrics.custom.len(), 1);
        assert_eq!(metrics.custom.get("rpc_latency_ms"), Some(&50.0));
    }

    #[test]
    fn test_metrics_serialization() {
        let mut metrics = Metrics::new();
        metrics.uptime_sec = 3600;
        metrics.record_success();
        metrics.record_failure();

        let json = serde_json::to_string(&metrics).unwrap();
        let deserialized: Metrics = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.uptime_sec, 3600);
        assert_eq!(deserialized.analyses_total, 2);
        assert_eq!(deserialized.analyses_success, 1);
        assert_eq!(deserialized.analyses_failed, 1);
    }
}
