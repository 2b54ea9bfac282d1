use netmon_types::Vendor;
use thiserror::Error;

/// Registry lookup miss. Callers decide whether this is fatal: the
/// orchestrator treats a miss during normal polling as a logged, non-fatal
/// event, while a miss for a device's *entire* vendor tag at registration
/// time is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnknownMappingError {
    #[error("no mapping registered for oid {0}")]
    Oid(String),

    #[error("no mapping for logical name '{logical_name}' under vendor '{vendor}'")]
    LogicalName { vendor: Vendor, logical_name: String },

    #[error("vendor tag '{0}' is not a known vendor")]
    UnknownVendor(Vendor),
}
