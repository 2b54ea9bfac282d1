//! Shared data model for the netmon SNMP monitoring engine.
//!
//! This crate has no I/O and no async runtime dependency: it is the vocabulary
//! every other crate in the workspace (`netmon-oid`, `netmon-snmp`,
//! `netmon-orchestrator`, `netmon-alarms`, `netmon-sink`) speaks.

pub mod alarm;
pub mod device;
pub mod error;
pub mod ids;
pub mod mapping;
pub mod sample;
pub mod value;

pub use alarm::{Alarm, AlarmKind, MetadataValue, Severity};
pub use device::{
    AuthProtocol, DeviceConfig, PollTier, PrivProtocol, TierIntervals, TransportCredentials,
    UsmAuth, UsmPrivacy,
};
pub use error::NormalizationError;
pub use ids::{DeviceId, Vendor};
pub use mapping::OidMapping;
pub use sample::{AdminStatus, HealthSample, InterfaceSample, InventorySample, OperStatus, Sample};
pub use value::{MappingKind, TypedValue};
