use std::time::Duration;

use async_trait::async_trait;
use netmon_types::{Alarm, Sample};

use crate::error::SinkError;
use crate::ring::RingBufferSink;
use crate::sink::Sink;

/// Delivers samples/alarms to a downstream HTTP collector as JSON, retaining
/// the most recent batch in a [`RingBufferSink`] whenever delivery fails: on
/// persistent sink failure this logs, preserves recent emissions, and drops
/// oldest-first.
pub struct HttpSink {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retention: RingBufferSink,
}

impl HttpSink {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// `timeout` bounds one publish call (default 10s).
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
            retention: RingBufferSink::default(),
        }
    }

    pub fn retention(&self) -> &RingBufferSink {
        &self.retention
    }

    async fn post_json(&self, path: &str, body: &impl serde::Serialize) -> Result<(), SinkError> {
        let url = format!("{}{path}", self.base_url);
        let send = self.client.post(&url).json(body).send();

        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| SinkError::Timeout)?
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SinkError::Transport(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn publish_samples(&self, batch: &[Sample]) -> Result<(), SinkError> {
        match self.post_json("/samples", &batch).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, count = batch.len(), "sample publish failed, retaining in ring buffer");
                self.retention.retain_samples(batch);
                Err(e)
            }
        }
    }

    async fn publish_alarms(&self, batch: &[Alarm]) -> Result<(), SinkError> {
        match self.post_json("/alarms", &batch).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, count = batch.len(), "alarm publish failed, retaining in ring buffer");
                self.retention.retain_alarms(batch);
                Err(e)
            }
        }
    }
}
