use chrono::{DateTime, Utc};

use crate::ids::DeviceId;

/// IF-MIB `ifAdminStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminStatus {
    Up,
    Down,
    Testing,
}

impl AdminStatus {
    /// Decode the IF-MIB integer encoding (1=up, 2=down, 3=testing).
    pub fn from_ifmib(value: i64) -> Option<Self> {
        match value {
            1 => Some(AdminStatus::Up),
            2 => Some(AdminStatus::Down),
            3 => Some(AdminStatus::Testing),
            _ => None,
        }
    }
}

/// IF-MIB `ifOperStatus`. `Unknown` covers the remaining IF-MIB values
/// (dormant, notPresent, lowerLayerDown) this engine does not alarm on
/// distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperStatus {
    Up,
    Down,
    Testing,
    Unknown,
}

impl OperStatus {
    pub fn from_ifmib(value: i64) -> Self {
        match value {
            1 => OperStatus::Up,
            2 => OperStatus::Down,
            3 => OperStatus::Testing,
            _ => OperStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InterfaceSample {
    pub device_id: DeviceId,
    pub if_index: u32,
    pub name: String,
    pub description: Option<String>,
    pub admin_status: AdminStatus,
    pub oper_status: OperStatus,
    pub speed_bps: Option<u64>,
    pub in_octets: u64,
    pub out_octets: u64,
    pub collected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct HealthSample {
    pub device_id: Option<DeviceId>,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub uptime_seconds: Option<u64>,
    pub collected_at: Option<DateTime<Utc>>,
}

impl HealthSample {
    pub fn new(device_id: DeviceId, collected_at: DateTime<Utc>) -> Self {
        Self {
            device_id: Some(device_id),
            collected_at: Some(collected_at),
            ..Default::default()
        }
    }

    /// Clamp a raw percent reading into `[0, 100]`.
    pub fn clamp_percent(raw: f64) -> f64 {
        raw.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InventorySample {
    pub device_id: DeviceId,
    pub system_description: Option<String>,
    pub serial: Option<String>,
    pub firmware_version: Option<String>,
    pub collected_at: DateTime<Utc>,
}

/// Unit of data the orchestrator hands to the alarm engine and the sink.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Sample {
    Interface(InterfaceSample),
    Health(HealthSample),
    Inventory(InventorySample),
}

impl Sample {
    pub fn device_id(&self) -> Option<DeviceId> {
        match self {
            Sample::Interface(s) => Some(s.device_id),
            Sample::Health(s) => s.device_id,
            Sample::Inventory(s) => Some(s.device_id),
        }
    }
}
