use thiserror::Error;

/// Classified session-layer error. `NoSuchName` is a normal "field absent"
/// signal for optional OIDs; every other variant is a genuine failure that
/// counts toward the orchestrator's unreachability threshold.
#[derive(Debug, Error, Clone)]
pub enum SnmpError {
    #[error("request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("no such name: {0}")]
    NoSuchName(String),

    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl SnmpError {
    /// Transient errors count toward the orchestrator's consecutive-failure
    /// reachability threshold; logical errors do not.
    pub fn is_transient(&self) -> bool {
        matches!(self, SnmpError::Timeout { .. } | SnmpError::Transport(_))
    }
}
