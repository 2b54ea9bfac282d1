use thiserror::Error;

/// Classified sink-layer error. The core never retries indefinitely on
/// either variant — it logs and falls back to ring-buffer retention.
#[derive(Debug, Error, Clone)]
pub enum SinkError {
    #[error("sink request timed out")]
    Timeout,

    #[error("sink transport error: {0}")]
    Transport(String),
}
