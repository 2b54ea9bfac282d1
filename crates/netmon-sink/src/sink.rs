use async_trait::async_trait;
use netmon_types::{Alarm, Sample};

use crate::error::SinkError;

/// Abstract downstream consumer of core output. The core only depends on
/// this trait; HTTP, a database writer, or a message queue can all
/// implement it without the core knowing which.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn publish_samples(&self, batch: &[Sample]) -> Result<(), SinkError>;

    async fn publish_alarms(&self, batch: &[Alarm]) -> Result<(), SinkError>;
}
