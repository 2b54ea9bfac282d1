use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use netmon_alarms::AlarmThresholds;
use netmon_orchestrator::SchedulerConfig;
use netmon_snmp::SessionConfig;
use netmon_types::DeviceConfig;
use serde::{Deserialize, Serialize};

/// Process-wide configuration. Loaded once at startup; device registration
/// after that goes through the administrative CLI subcommands, not a config
/// reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_max_concurrent_pollers")]
    pub max_concurrent_pollers: usize,
    #[serde(default = "default_snmp_timeout_seconds")]
    pub snmp_timeout_seconds: u64,
    #[serde(default = "default_snmp_retries")]
    pub snmp_retries: u32,
    #[serde(default = "default_max_repetitions")]
    pub max_repetitions: u32,
    #[serde(default = "default_shutdown_grace_seconds")]
    pub shutdown_grace_seconds: u64,
    #[serde(default)]
    pub thresholds: AlarmThresholdsConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmThresholdsConfig {
    #[serde(default = "default_percent_threshold")]
    pub cpu_threshold_percent: f64,
    #[serde(default = "default_percent_threshold")]
    pub memory_threshold_percent: f64,
    #[serde(default = "default_temp_threshold")]
    pub temperature_threshold_celsius: f64,
    #[serde(default = "default_hysteresis_percent")]
    pub hysteresis_percent: f64,
    #[serde(default = "default_hysteresis_celsius")]
    pub hysteresis_celsius: f64,
    #[serde(default = "default_unreachable_failure_count")]
    pub unreachable_failure_count: u32,
}

impl Default for AlarmThresholdsConfig {
    fn default() -> Self {
        let defaults = AlarmThresholds::default();
        Self {
            cpu_threshold_percent: defaults.cpu_threshold_percent,
            memory_threshold_percent: defaults.memory_threshold_percent,
            temperature_threshold_celsius: defaults.temperature_threshold_celsius,
            hysteresis_percent: defaults.hysteresis_percent,
            hysteresis_celsius: defaults.hysteresis_celsius,
            unreachable_failure_count: defaults.unreachable_failure_count,
        }
    }
}

impl From<AlarmThresholdsConfig> for AlarmThresholds {
    fn from(cfg: AlarmThresholdsConfig) -> Self {
        AlarmThresholds {
            cpu_threshold_percent: cfg.cpu_threshold_percent,
            memory_threshold_percent: cfg.memory_threshold_percent,
            temperature_threshold_celsius: cfg.temperature_threshold_celsius,
            hysteresis_percent: cfg.hysteresis_percent,
            hysteresis_celsius: cfg.hysteresis_celsius,
            unreachable_failure_count: cfg.unreachable_failure_count,
        }
    }
}

/// Downstream sink selection. `None` (the default) runs with an in-memory
/// ring buffer only, which is enough for `devices list`/local testing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkConfig {
    pub http_base_url: Option<String>,
}

impl AgentConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: AgentConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            timeout: Duration::from_secs(self.snmp_timeout_seconds),
            retries: self.snmp_retries,
            max_repetitions: self.max_repetitions,
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            max_concurrent_pollers: self.max_concurrent_pollers,
            shutdown_grace: Duration::from_secs(self.shutdown_grace_seconds),
        }
    }
}

fn default_max_concurrent_pollers() -> usize {
    20
}
fn default_snmp_timeout_seconds() -> u64 {
    5
}
fn default_snmp_retries() -> u32 {
    3
}
fn default_max_repetitions() -> u32 {
    10
}
fn default_shutdown_grace_seconds() -> u64 {
    10
}
fn default_percent_threshold() -> f64 {
    80.0
}
fn default_temp_threshold() -> f64 {
    80.0
}
fn default_hysteresis_percent() -> f64 {
    5.0
}
fn default_hysteresis_celsius() -> f64 {
    5.0
}
fn default_unreachable_failure_count() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "devices: []").unwrap();
        let config = AgentConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.max_concurrent_pollers, 20);
        assert_eq!(config.snmp_retries, 3);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn loads_devices_and_overridden_thresholds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
thresholds:
  cpu_threshold_percent: 90
devices:
  - device_id: 1
    name: core-switch-1
    address: 192.0.2.10
    credentials:
      version: v2c
      community: public
    vendor_tag: cisco
    enabled: true
    tier_intervals:
      interfaces_secs: 30
      health_secs: 300
      inventory_secs: 3600
"#
        )
        .unwrap();
        let config = AgentConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.thresholds.cpu_threshold_percent, 90.0);
    }
}
