use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::DeviceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// The ten alarm kinds this engine evaluates. Kept as a closed enum (not a
/// free-form string) so the alarm engine's rule table and tests can match
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    PortDown,
    PortUp,
    DeviceUnreachable,
    DeviceReachable,
    CpuHigh,
    CpuNormal,
    MemoryHigh,
    MemoryNormal,
    TemperatureHigh,
    TemperatureNormal,
}

impl AlarmKind {
    /// Severity of the raise half of this rule. Recovery/clear alarms are
    /// always reported at `Info` — `port_up`/`device_reachable` clear at
    /// `info` even though their raise counterpart is `critical`, and this
    /// generalizes that to every rule rather than leaving the other three
    /// clears unspecified.
    pub fn severity(&self) -> Severity {
        if self.is_recovery() {
            return Severity::Info;
        }
        match self {
            AlarmKind::PortDown => Severity::Critical,
            AlarmKind::DeviceUnreachable => Severity::Critical,
            AlarmKind::CpuHigh | AlarmKind::MemoryHigh => Severity::Warning,
            AlarmKind::TemperatureHigh => Severity::Critical,
            _ => unreachable!("recovery kinds handled above"),
        }
    }

    /// Whether this kind represents the "clear" half of a raise/clear pair.
    pub fn is_recovery(&self) -> bool {
        matches!(
            self,
            AlarmKind::PortUp
                | AlarmKind::DeviceReachable
                | AlarmKind::CpuNormal
                | AlarmKind::MemoryNormal
                | AlarmKind::TemperatureNormal
        )
    }
}

/// A single metadata value attached to an alarm. Kept as a small closed enum
/// rather than `serde_json::Value` so alarm construction stays allocation-light
/// and type-checked at the call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::Text(v.to_string())
    }
}
impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::Text(v)
    }
}
impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Int(v)
    }
}
impl From<u32> for MetadataValue {
    fn from(v: u32) -> Self {
        MetadataValue::Int(v as i64)
    }
}
impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

/// Emitted alarm record. Never mutated after emission by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    /// Unique per emitted alarm — a raise and its matching clear are two
    /// distinct alarms, each with their own id. Lets a downstream sink or
    /// dashboard correlate an alarm across retries/delivery without relying
    /// on (device_id, kind, raised_at) as an implicit key.
    pub correlation_id: Uuid,
    pub device_id: DeviceId,
    pub device_name: String,
    pub kind: AlarmKind,
    pub severity: Severity,
    pub message: String,
    pub metadata: HashMap<String, MetadataValue>,
    pub raised_at: DateTime<Utc>,
    pub recovery: bool,
}

impl Alarm {
    pub fn new(
        device_id: DeviceId,
        device_name: impl Into<String>,
        kind: AlarmKind,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        let recovery = kind.is_recovery();
        Self {
            correlation_id: Uuid::new_v4(),
            device_id,
            device_name: device_name.into(),
            kind,
            severity: kind.severity(),
            message: message.into(),
            metadata: HashMap::new(),
            raised_at,
            recovery,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
