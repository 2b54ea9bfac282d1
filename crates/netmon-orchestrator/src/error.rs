use netmon_oid::UnknownMappingError;
use netmon_snmp::SnmpError;
use netmon_types::DeviceId;
use thiserror::Error;

/// Orchestrator-level error. Distinguishes registration mistakes (caller
/// bugs) from poll-time failures (device/network conditions the scheduler
/// already accounts for via reachability).
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("device {0} is not registered")]
    UnknownDevice(DeviceId),

    #[error("device {0} is already registered")]
    AlreadyRegistered(DeviceId),

    #[error("a poll for device {0} tier {1} is already in flight")]
    PollInProgress(DeviceId, String),

    #[error("registry has no mapping for required logical name {0:?}")]
    MissingMapping(String),

    #[error(transparent)]
    Oid(#[from] UnknownMappingError),

    #[error(transparent)]
    Snmp(#[from] SnmpError),
}
