use std::collections::HashMap;

/// Per-device memory the alarm engine needs to detect edges. Created lazily
/// on first observation of a device, purged on `forget`.
#[derive(Debug, Default)]
pub struct DeviceAlarmState {
    /// `if_index` -> whether `admin_status=up ∧ oper_status=down` held at
    /// the last observation of that interface.
    pub(crate) last_port_down_condition: HashMap<u32, bool>,
    pub(crate) consecutive_failures: u32,
    /// `None` = `Unknown`; otherwise reachable/not.
    pub(crate) reachable: Option<bool>,
    pub(crate) cpu_high: Option<bool>,
    pub(crate) memory_high: Option<bool>,
    pub(crate) temperature_high: Option<bool>,
}
