/// Process-wide alarm thresholds. Per-device overrides are allowed by the
/// data model (`DeviceConfig`) but out of scope for the default
/// configuration — this engine is constructed with one set of thresholds
/// shared by every device.
#[derive(Debug, Clone, Copy)]
pub struct AlarmThresholds {
    pub cpu_threshold_percent: f64,
    pub memory_threshold_percent: f64,
    pub temperature_threshold_celsius: f64,
    pub hysteresis_percent: f64,
    pub hysteresis_celsius: f64,
    pub unreachable_failure_count: u32,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            cpu_threshold_percent: 80.0,
            memory_threshold_percent: 80.0,
            temperature_threshold_celsius: 80.0,
            hysteresis_percent: 5.0,
            hysteresis_celsius: 5.0,
            unreachable_failure_count: 3,
        }
    }
}
