use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use netmon_types::{Alarm, Sample};

use crate::error::SinkError;
use crate::sink::Sink;

/// Default ring capacity per kind.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded, drop-oldest retention buffer. Usable standalone as a `Sink` (for
/// tests, or a process with no downstream wired up) or wrapped by another
/// sink to retain recent emissions across a delivery failure.
pub struct RingBufferSink {
    capacity: usize,
    samples: Mutex<VecDeque<Sample>>,
    alarms: Mutex<VecDeque<Alarm>>,
}

impl RingBufferSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            alarms: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn retain_samples(&self, batch: &[Sample]) {
        let mut ring = self.samples.lock().unwrap();
        for sample in batch {
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(sample.clone());
        }
    }

    pub fn retain_alarms(&self, batch: &[Alarm]) {
        let mut ring = self.alarms.lock().unwrap();
        for alarm in batch {
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(alarm.clone());
        }
    }

    pub fn samples_snapshot(&self) -> Vec<Sample> {
        self.samples.lock().unwrap().iter().cloned().collect()
    }

    pub fn alarms_snapshot(&self) -> Vec<Alarm> {
        self.alarms.lock().unwrap().iter().cloned().collect()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    pub fn alarm_count(&self) -> usize {
        self.alarms.lock().unwrap().len()
    }
}

impl Default for RingBufferSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl Sink for RingBufferSink {
    async fn publish_samples(&self, batch: &[Sample]) -> Result<(), SinkError> {
        self.retain_samples(batch);
        Ok(())
    }

    async fn publish_alarms(&self, batch: &[Alarm]) -> Result<(), SinkError> {
        self.retain_alarms(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use netmon_types::{Alarm, AlarmKind, DeviceId};

    use super::*;

    fn alarm(n: u64) -> Alarm {
        Alarm::new(DeviceId(n), "dev", AlarmKind::PortDown, "down", Utc::now())
    }

    #[test]
    fn drops_oldest_once_capacity_is_reached() {
        let ring = RingBufferSink::new(2);
        ring.retain_alarms(&[alarm(1)]);
        ring.retain_alarms(&[alarm(2)]);
        ring.retain_alarms(&[alarm(3)]);
        let snapshot = ring.alarms_snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].device_id, DeviceId(2));
        assert_eq!(snapshot[1].device_id, DeviceId(3));
    }
}
