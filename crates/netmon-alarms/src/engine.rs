use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use netmon_types::{Alarm, AlarmKind, DeviceId, HealthSample, InterfaceSample};

use crate::state::DeviceAlarmState;
use crate::thresholds::AlarmThresholds;

/// Stateful, per-device alarm evaluator. Operations on one device's state
/// are serialized by a per-device mutex; different devices evaluate
/// concurrently without contending on a single lock.
pub struct AlarmEngine {
    thresholds: AlarmThresholds,
    states: RwLock<HashMap<DeviceId, Arc<Mutex<DeviceAlarmState>>>>,
}

impl AlarmEngine {
    pub fn new(thresholds: AlarmThresholds) -> Self {
        Self {
            thresholds,
            states: RwLock::new(HashMap::new()),
        }
    }

    fn state_for(&self, device_id: DeviceId) -> Arc<Mutex<DeviceAlarmState>> {
        if let Some(existing) = self.states.read().unwrap().get(&device_id) {
            return existing.clone();
        }
        let mut states = self.states.write().unwrap();
        states
            .entry(device_id)
            .or_insert_with(|| Arc::new(Mutex::new(DeviceAlarmState::default())))
            .clone()
    }

    /// Purge state on deregister, so a later re-registration starts from a
    /// fresh baseline rather than stale edge/hysteresis state.
    pub fn forget(&self, device_id: DeviceId) {
        self.states.write().unwrap().remove(&device_id);
    }

    pub fn evaluate_interface(&self, device_name: &str, sample: &InterfaceSample) -> Vec<Alarm> {
        let cell = self.state_for(sample.device_id);
        let mut state = cell.lock().unwrap();

        let condition_now =
            sample.admin_status == netmon_types::AdminStatus::Up && sample.oper_status == netmon_types::OperStatus::Down;
        let prior = state
            .last_port_down_condition
            .insert(sample.if_index, condition_now);

        let mut alarms = Vec::new();
        let transitioned_to_down = match prior {
            None => condition_now, // no baseline: emit immediately if already down
            Some(was_down) => !was_down && condition_now,
        };
        // Clearing requires the interface to actually be back up, not merely
        // that the down condition no longer holds — admin_status flipping to
        // down, or oper_status moving to Testing/Unknown, also make
        // `condition_now` false without the interface having recovered.
        let transitioned_to_up =
            matches!(prior, Some(true)) && sample.oper_status == netmon_types::OperStatus::Up;

        if transitioned_to_down {
            alarms.push(
                Alarm::new(
                    sample.device_id,
                    device_name,
                    AlarmKind::PortDown,
                    format!("interface {} ({}) is down", sample.if_index, sample.name),
                    sample.collected_at,
                )
                .with_metadata("if_index", sample.if_index as i64)
                .with_metadata("name", sample.name.clone()),
            );
        } else if transitioned_to_up {
            alarms.push(
                Alarm::new(
                    sample.device_id,
                    device_name,
                    AlarmKind::PortUp,
                    format!("interface {} ({}) recovered", sample.if_index, sample.name),
                    sample.collected_at,
                )
                .with_metadata("if_index", sample.if_index as i64)
                .with_metadata("name", sample.name.clone()),
            );
        }

        alarms
    }

    pub fn evaluate_health(&self, device_name: &str, sample: &HealthSample) -> Vec<Alarm> {
        let Some(device_id) = sample.device_id else {
            return Vec::new();
        };
        let now = sample.collected_at.unwrap_or_else(Utc::now);
        let cell = self.state_for(device_id);
        let mut state = cell.lock().unwrap();

        let mut alarms = Vec::new();

        if let Some(alarm) = evaluate_gauge(
            &mut state.cpu_high,
            sample.cpu_percent,
            self.thresholds.cpu_threshold_percent,
            self.thresholds.hysteresis_percent,
            AlarmKind::CpuHigh,
            AlarmKind::CpuNormal,
            device_id,
            device_name,
            now,
            "CPU usage",
        ) {
            alarms.push(alarm);
        }

        if let Some(alarm) = evaluate_gauge(
            &mut state.memory_high,
            sample.memory_percent,
            self.thresholds.memory_threshold_percent,
            self.thresholds.hysteresis_percent,
            AlarmKind::MemoryHigh,
            AlarmKind::MemoryNormal,
            device_id,
            device_name,
            now,
            "memory usage",
        ) {
            alarms.push(alarm);
        }

        if let Some(alarm) = evaluate_gauge(
            &mut state.temperature_high,
            sample.temperature_celsius,
            self.thresholds.temperature_threshold_celsius,
            self.thresholds.hysteresis_celsius,
            AlarmKind::TemperatureHigh,
            AlarmKind::TemperatureNormal,
            device_id,
            device_name,
            now,
            "temperature",
        ) {
            alarms.push(alarm);
        }

        alarms
    }

    /// Reachability is fed by the orchestrator as `success`/`failure` events
    /// for any tier poll.
    pub fn evaluate_reachability(
        &self,
        device_id: DeviceId,
        device_name: &str,
        success: bool,
    ) -> Vec<Alarm> {
        let cell = self.state_for(device_id);
        let mut state = cell.lock().unwrap();
        let now = Utc::now();

        let mut alarms = Vec::new();

        if success {
            state.consecutive_failures = 0;
            if state.reachable == Some(false) {
                alarms.push(Alarm::new(
                    device_id,
                    device_name,
                    AlarmKind::DeviceReachable,
                    format!("device {device_name} is reachable again"),
                    now,
                ));
            }
            state.reachable = Some(true);
        } else {
            state.consecutive_failures += 1;
            let already_unreachable = state.reachable == Some(false);
            if !already_unreachable && state.consecutive_failures >= self.thresholds.unreachable_failure_count {
                alarms.push(Alarm::new(
                    device_id,
                    device_name,
                    AlarmKind::DeviceUnreachable,
                    format!(
                        "device {device_name} unreachable after {} consecutive failures",
                        state.consecutive_failures
                    ),
                    now,
                ));
                state.reachable = Some(false);
            }
        }

        alarms
    }
}

#[allow(clippy::too_many_arguments)]
fn evaluate_gauge(
    flag: &mut Option<bool>,
    raw: Option<f64>,
    threshold: f64,
    hysteresis: f64,
    raise_kind: AlarmKind,
    clear_kind: AlarmKind,
    device_id: DeviceId,
    device_name: &str,
    now: chrono::DateTime<Utc>,
    metric_label: &str,
) -> Option<Alarm> {
    // Missing field: leave the rule's state untouched, no raise or clear.
    let raw = raw?;
    let high_now = raw > threshold;

    match *flag {
        None => {
            *flag = Some(high_now);
            if high_now {
                Some(
                    Alarm::new(
                        device_id,
                        device_name,
                        raise_kind,
                        format!("{metric_label} {raw:.1} exceeds threshold {threshold:.1}"),
                        now,
                    )
                    .with_metadata("value", raw),
                )
            } else {
                None
            }
        }
        Some(false) => {
            if high_now {
                *flag = Some(true);
                Some(
                    Alarm::new(
                        device_id,
                        device_name,
                        raise_kind,
                        format!("{metric_label} {raw:.1} exceeds threshold {threshold:.1}"),
                        now,
                    )
                    .with_metadata("value", raw),
                )
            } else {
                None
            }
        }
        Some(true) => {
            if raw <= threshold - hysteresis {
                *flag = Some(false);
                Some(
                    Alarm::new(
                        device_id,
                        device_name,
                        clear_kind,
                        format!("{metric_label} {raw:.1} back below {:.1}", threshold - hysteresis),
                        now,
                    )
                    .with_metadata("value", raw),
                )
            } else {
                None
            }
        }
    }
}
