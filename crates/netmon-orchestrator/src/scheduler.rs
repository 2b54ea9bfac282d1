use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use netmon_alarms::AlarmEngine;
use netmon_oid::OidRegistry;
use netmon_sink::Sink;
use netmon_snmp::{Snmp2Session, SnmpSession};
use netmon_types::{DeviceConfig, DeviceId, PollTier, Sample};
use rand::Rng;
use tokio::sync::{watch, Mutex as AsyncMutex, Semaphore};
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::normalize;
use crate::registry::DeviceRegistry;

/// Opens the per-device session the scheduler polls through. Kept as a trait
/// so tests can swap in an in-memory session instead of opening a real
/// socket.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, device: &DeviceConfig) -> Result<Arc<dyn SnmpSession>, OrchestratorError>;
}

/// Default connector: opens a real [`Snmp2Session`] per device.
struct Snmp2Connector {
    config: netmon_snmp::SessionConfig,
}

#[async_trait]
impl SessionConnector for Snmp2Connector {
    async fn connect(&self, device: &DeviceConfig) -> Result<Arc<dyn SnmpSession>, OrchestratorError> {
        let session = Snmp2Session::connect(&device.address, device.credentials.clone(), self.config).await?;
        Ok(Arc::new(session) as Arc<dyn SnmpSession>)
    }
}

/// Bounds worker concurrency and shutdown latency.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub max_concurrent_pollers: usize,
    pub shutdown_grace: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pollers: 20,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduleEntry {
    device_id: DeviceId,
    tier: PollTier,
    due_at: Instant,
}

// `BinaryHeap` is a max-heap; wrapping in `Reverse` and ordering solely by
// `due_at` turns it into the earliest-due-first priority queue the
// scheduling model needs.
impl Ord for ScheduleEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due_at.cmp(&other.due_at)
    }
}
impl PartialOrd for ScheduleEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct Queue {
    heap: BinaryHeap<Reverse<ScheduleEntry>>,
    scheduled: HashSet<(DeviceId, PollTier)>,
}

/// Drives the three polling tiers across all registered devices, bounded by
/// a worker semaphore, with a per-(device, tier) re-entrancy guard shared
/// between the schedule and `poll_now`.
pub struct Scheduler {
    devices: Arc<DeviceRegistry>,
    oid_registry: Arc<OidRegistry>,
    connector: Arc<dyn SessionConnector>,
    alarms: Arc<AlarmEngine>,
    sink: Arc<dyn Sink>,
    config: SchedulerConfig,
    queue: AsyncMutex<Queue>,
    in_flight: std::sync::Mutex<HashSet<(DeviceId, PollTier)>>,
    sessions: AsyncMutex<HashMap<DeviceId, Arc<dyn SnmpSession>>>,
    semaphore: Semaphore,
}

impl Scheduler {
    pub fn new(
        devices: Arc<DeviceRegistry>,
        oid_registry: Arc<OidRegistry>,
        snmp_config: netmon_snmp::SessionConfig,
        alarms: Arc<AlarmEngine>,
        sink: Arc<dyn Sink>,
        config: SchedulerConfig,
    ) -> Self {
        Self::with_connector(
            devices,
            oid_registry,
            Arc::new(Snmp2Connector { config: snmp_config }),
            alarms,
            sink,
            config,
        )
    }

    /// Same as [`Scheduler::new`], with the session connector injected —
    /// used by tests to swap in an in-memory [`SnmpSession`] rather than
    /// opening a real socket.
    pub fn with_connector(
        devices: Arc<DeviceRegistry>,
        oid_registry: Arc<OidRegistry>,
        connector: Arc<dyn SessionConnector>,
        alarms: Arc<AlarmEngine>,
        sink: Arc<dyn Sink>,
        config: SchedulerConfig,
    ) -> Self {
        let semaphore = Semaphore::new(config.max_concurrent_pollers);
        Self {
            devices,
            oid_registry,
            connector,
            alarms,
            sink,
            config,
            queue: AsyncMutex::new(Queue::default()),
            in_flight: std::sync::Mutex::new(HashSet::new()),
            sessions: AsyncMutex::new(HashMap::new()),
            semaphore,
        }
    }

    /// Run until `shutdown` reports `true`. New devices registered while
    /// running are picked up on the next reconciliation tick.
    pub async fn run(self: &Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!("polling orchestrator started");
        loop {
            if *shutdown.borrow() {
                break;
            }

            self.reconcile_queue().await;
            let wait = self.time_until_next_due().await;

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }

            self.dispatch_due_entries().await;
        }

        info!(grace_secs = self.config.shutdown_grace.as_secs(), "shutting down, waiting for in-flight polls");
        let deadline = Instant::now() + self.config.shutdown_grace;
        while Instant::now() < deadline {
            if self.in_flight.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        info!("polling orchestrator stopped");
    }

    /// Ensure every enabled device has a pending entry for every tier, with
    /// jitter on its first-ever scheduling.
    async fn reconcile_queue(&self) {
        let mut queue = self.queue.lock().await;
        for device_id in self.devices.enabled_device_ids() {
            for tier in PollTier::ALL {
                let key = (device_id, tier);
                if queue.scheduled.contains(&key) {
                    continue;
                }
                let jitter = Duration::from_millis(
                    rand::thread_rng().gen_range(0..tier_interval_ms(&self.devices, device_id, tier).max(1)),
                );
                let due_at = Instant::now() + jitter;
                queue.scheduled.insert(key);
                queue.heap.push(Reverse(ScheduleEntry { device_id, tier, due_at }));
            }
        }
    }

    async fn time_until_next_due(&self) -> Duration {
        let queue = self.queue.lock().await;
        match queue.heap.peek() {
            Some(Reverse(entry)) => entry.due_at.saturating_duration_since(Instant::now()),
            None => Duration::from_secs(1),
        }
    }

    /// Pop every entry whose deadline has passed and either dispatch it or
    /// skip-and-reschedule it if its (device, tier) is already in flight.
    async fn dispatch_due_entries(self: &Arc<Self>) {
        let due = {
            let mut queue = self.queue.lock().await;
            let mut due = Vec::new();
            while let Some(Reverse(entry)) = queue.heap.peek().copied() {
                if entry.due_at > Instant::now() {
                    break;
                }
                queue.heap.pop();
                due.push(entry);
            }
            due
        };

        for entry in due {
            let Ok(device) = self.devices.get(entry.device_id) else {
                // Deregistered since scheduling; drop the slot silently.
                self.queue.lock().await.scheduled.remove(&(entry.device_id, entry.tier));
                continue;
            };
            if !device.enabled {
                self.queue.lock().await.scheduled.remove(&(entry.device_id, entry.tier));
                continue;
            }

            if !self.mark_in_flight(entry.device_id, entry.tier) {
                debug!(device_id = %entry.device_id, tier = %entry.tier, "tick skipped, poll already in flight");
                self.requeue(entry.device_id, entry.tier, entry.due_at + device.tier_intervals.get(entry.tier))
                    .await;
                continue;
            }

            let this = Arc::clone(self);
            let interval = device.tier_intervals.get(entry.tier);
            let next_due = entry.due_at + interval;
            tokio::spawn(async move {
                let _permit = this.semaphore.acquire().await;
                let _ = this.execute(entry.device_id, entry.tier).await;
                this.clear_in_flight(entry.device_id, entry.tier);
                this.requeue(entry.device_id, entry.tier, next_due).await;
            });
        }
    }

    async fn requeue(&self, device_id: DeviceId, tier: PollTier, due_at: Instant) {
        let mut queue = self.queue.lock().await;
        queue.heap.push(Reverse(ScheduleEntry { device_id, tier, due_at }));
    }

    fn mark_in_flight(&self, device_id: DeviceId, tier: PollTier) -> bool {
        self.in_flight.lock().unwrap().insert((device_id, tier))
    }

    fn clear_in_flight(&self, device_id: DeviceId, tier: PollTier) {
        self.in_flight.lock().unwrap().remove(&(device_id, tier));
    }

    /// One-shot bypass of the schedule; obeys the same re-entrancy guard as
    /// scheduled ticks.
    pub async fn poll_now(&self, device_id: DeviceId, tier: PollTier) -> Result<(), OrchestratorError> {
        let _device = self.devices.get(device_id)?;
        if !self.mark_in_flight(device_id, tier) {
            return Err(OrchestratorError::PollInProgress(device_id, tier.to_string()));
        }
        let result = self.execute(device_id, tier).await;
        self.clear_in_flight(device_id, tier);
        result
    }

    async fn session_for(&self, device: &DeviceConfig) -> Result<Arc<dyn SnmpSession>, OrchestratorError> {
        if let Some(session) = self.sessions.lock().await.get(&device.device_id) {
            return Ok(session.clone());
        }
        let session = self.connector.connect(device).await?;
        self.sessions
            .lock()
            .await
            .insert(device.device_id, session.clone());
        Ok(session)
    }

    async fn execute(&self, device_id: DeviceId, tier: PollTier) -> Result<(), OrchestratorError> {
        let device = self.devices.get(device_id)?;
        let session = match self.session_for(&device).await {
            Ok(session) => session,
            Err(e) => {
                let alarms = self.report_failure(device_id, &device.name);
                self.publish(Vec::new(), alarms).await;
                return Err(e);
            }
        };

        let outcome = match tier {
            PollTier::Interfaces => {
                normalize::poll_interfaces(session.as_ref(), &self.oid_registry, &device)
                    .await
                    .map(|samples| {
                        let alarms: Vec<_> = samples
                            .iter()
                            .flat_map(|s| self.alarms.evaluate_interface(&device.name, s))
                            .collect();
                        (
                            samples.into_iter().map(Sample::Interface).collect::<Vec<_>>(),
                            alarms,
                        )
                    })
            }
            PollTier::Health => {
                normalize::poll_health(session.as_ref(), &self.oid_registry, &device)
                    .await
                    .map(|sample| {
                        let alarms = self.alarms.evaluate_health(&device.name, &sample);
                        (vec![Sample::Health(sample)], alarms)
                    })
            }
            PollTier::Inventory => {
                normalize::poll_inventory(session.as_ref(), &self.oid_registry, &device)
                    .await
                    .map(|sample| (vec![Sample::Inventory(sample)], Vec::new()))
            }
        };

        match outcome {
            Ok((samples, mut alarms)) => {
                let reachability_alarms = self.report_success(device_id, &device.name);
                alarms.extend(reachability_alarms);
                self.publish(samples, alarms).await;
                Ok(())
            }
            Err(e) => {
                warn!(device_id = %device_id, tier = %tier, error = %e, "tier poll failed");
                let alarms = self.report_failure(device_id, &device.name);
                self.publish(Vec::new(), alarms).await;
                Err(e)
            }
        }
    }

    fn report_success(&self, device_id: DeviceId, device_name: &str) -> Vec<netmon_types::Alarm> {
        self.alarms.evaluate_reachability(device_id, device_name, true)
    }

    fn report_failure(&self, device_id: DeviceId, device_name: &str) -> Vec<netmon_types::Alarm> {
        self.alarms.evaluate_reachability(device_id, device_name, false)
    }

    async fn publish(&self, samples: Vec<Sample>, alarms: Vec<netmon_types::Alarm>) {
        if !samples.is_empty() {
            if let Err(e) = self.sink.publish_samples(&samples).await {
                warn!(error = %e, "sample publish failed");
            }
        }
        if !alarms.is_empty() {
            if let Err(e) = self.sink.publish_alarms(&alarms).await {
                warn!(error = %e, "alarm publish failed");
            }
        }
    }
}

fn tier_interval_ms(devices: &DeviceRegistry, device_id: DeviceId, tier: PollTier) -> u64 {
    devices
        .get(device_id)
        .map(|d| d.tier_intervals.get(tier).as_millis() as u64)
        .unwrap_or(1000)
}

#[cfg(test)]
mod tests {
    use netmon_alarms::AlarmEngine;
    use netmon_oid::OidRegistry;
    use netmon_sink::RingBufferSink;
    use netmon_types::{TierIntervals, TransportCredentials, Vendor};

    use super::*;
    use crate::test_support::FakeSnmpSession;

    fn device(id: u64, interval_secs: u64) -> DeviceConfig {
        DeviceConfig {
            device_id: DeviceId(id),
            name: format!("dev-{id}"),
            address: "192.0.2.1".to_string(),
            credentials: TransportCredentials::V2c { community: "public".to_string() },
            vendor_tag: Vendor::new("generic"),
            enabled: true,
            tier_intervals: TierIntervals {
                interfaces_secs: interval_secs,
                health_secs: interval_secs,
                inventory_secs: interval_secs,
            },
        }
    }

    struct FakeConnector;

    #[async_trait]
    impl SessionConnector for FakeConnector {
        async fn connect(&self, _device: &DeviceConfig) -> Result<Arc<dyn SnmpSession>, OrchestratorError> {
            Ok(Arc::new(FakeSnmpSession::new()) as Arc<dyn SnmpSession>)
        }
    }

    fn scheduler_with(devices: Vec<DeviceConfig>) -> Arc<Scheduler> {
        let registry = DeviceRegistry::new();
        let oid_registry = Arc::new(OidRegistry::with_builtin_vendors());
        for d in devices {
            registry.register_device(d, &oid_registry).unwrap();
        }
        Arc::new(Scheduler::with_connector(
            Arc::new(registry),
            oid_registry,
            Arc::new(FakeConnector),
            Arc::new(AlarmEngine::new(Default::default())),
            Arc::new(RingBufferSink::default()),
            SchedulerConfig::default(),
        ))
    }

    // First-ever scheduling of a (device, tier) lands somewhere in
    // [now, now + interval) rather than always exactly on `interval` — the
    // jitter that keeps a fleet of devices registered at once from all
    // polling in lockstep.
    #[tokio::test]
    async fn jitter_spreads_first_scheduling_within_interval() {
        let scheduler = scheduler_with(vec![device(1, 10)]);
        let before = Instant::now();

        scheduler.reconcile_queue().await;

        let queue = scheduler.queue.lock().await;
        assert_eq!(queue.heap.len(), 3); // one entry per tier
        for Reverse(entry) in queue.heap.iter() {
            assert!(entry.due_at >= before);
            assert!(entry.due_at < before + Duration::from_secs(10));
        }
    }

    // A due tick for a (device, tier) already in flight is skipped, not
    // queued again immediately, and reschedules from its *original* due_at
    // plus the interval rather than from `now` — so a run of skipped ticks
    // doesn't drift the cadence later and later.
    #[tokio::test]
    async fn skipped_tick_requeues_from_original_deadline_not_now() {
        let scheduler = scheduler_with(vec![device(1, 10)]);
        let dev_id = DeviceId(1);
        let tier = PollTier::Interfaces;
        // Already due (in the past relative to `dispatch_due_entries`'s own
        // `Instant::now()` call) so it is picked up without waiting.
        let due_at = Instant::now() - Duration::from_millis(1);

        {
            let mut queue = scheduler.queue.lock().await;
            queue.scheduled.insert((dev_id, tier));
            queue.heap.push(Reverse(ScheduleEntry { device_id: dev_id, tier, due_at }));
        }
        assert!(scheduler.mark_in_flight(dev_id, tier));

        scheduler.dispatch_due_entries().await;

        let queue = scheduler.queue.lock().await;
        let requeued = queue
            .heap
            .iter()
            .find(|Reverse(e)| e.device_id == dev_id && e.tier == tier)
            .expect("skipped entry is requeued, not dropped");
        assert_eq!(requeued.0.due_at, due_at + Duration::from_secs(10));
    }

    // `poll_now` obeys the same (device, tier) re-entrancy guard the
    // scheduled path does: at most one poll in flight at a time.
    #[tokio::test]
    async fn poll_now_rejects_while_already_in_flight() {
        let scheduler = scheduler_with(vec![device(1, 10)]);
        assert!(scheduler.mark_in_flight(DeviceId(1), PollTier::Interfaces));

        let err = scheduler
            .poll_now(DeviceId(1), PollTier::Interfaces)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::PollInProgress(_, _)));

        scheduler.clear_in_flight(DeviceId(1), PollTier::Interfaces);
        scheduler.poll_now(DeviceId(1), PollTier::Interfaces).await.unwrap();
    }
}
