//! Alarm engine: stateful, edge-triggered alarm detection with hysteresis
//! on gauge metrics, applied independently per device.

pub mod engine;
pub mod state;
pub mod thresholds;

pub use engine::AlarmEngine;
pub use state::DeviceAlarmState;
pub use thresholds::AlarmThresholds;

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use netmon_types::{AdminStatus, AlarmKind, DeviceId, HealthSample, InterfaceSample, OperStatus};

    use super::*;

    fn iface(device_id: DeviceId, admin: AdminStatus, oper: OperStatus) -> InterfaceSample {
        InterfaceSample {
            device_id,
            if_index: 1,
            name: "Gi0/1".to_string(),
            description: None,
            admin_status: admin,
            oper_status: oper,
            speed_bps: Some(1_000_000_000),
            in_octets: 0,
            out_octets: 0,
            collected_at: Utc::now(),
        }
    }

    // First-ever observation of a down interface raises immediately, with
    // no prior baseline required.
    #[test]
    fn port_down_raises_on_first_observation() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].kind, AlarmKind::PortDown);
    }

    // First-seen oper_status=up never emits anything.
    #[test]
    fn no_alarm_on_first_observation_of_up_interface() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Up));
        assert!(alarms.is_empty());
    }

    // A down/up transition raises port_down then, later, recovers with
    // port_up at severity info.
    #[test]
    fn port_recovers_after_down() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Up));
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].kind, AlarmKind::PortUp);
        assert_eq!(alarms[0].severity, netmon_types::Severity::Info);
    }

    // Admin-down interfaces are excluded from the port_down condition even
    // when oper_status is down: the condition requires admin=up.
    #[test]
    fn admin_down_interface_never_raises() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Down, OperStatus::Down));
        assert!(alarms.is_empty());
    }

    // Flipping admin_status to down while oper_status stays down must not be
    // read as a recovery: the interface never came back up.
    #[test]
    fn admin_down_after_port_down_does_not_raise_port_up() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Down, OperStatus::Down));
        assert!(alarms.is_empty());
    }

    // oper_status moving to Testing/Unknown while admin stays up is not a
    // recovery either — only oper_status=up clears port_down.
    #[test]
    fn oper_status_testing_after_port_down_does_not_raise_port_up() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Testing));
        assert!(alarms.is_empty());
    }

    // Steady down state does not re-raise on every poll.
    #[test]
    fn port_down_does_not_repeat_while_still_down() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        assert!(alarms.is_empty());
    }

    fn health(cpu: f64) -> HealthSample {
        HealthSample {
            device_id: Some(DeviceId(1)),
            cpu_percent: Some(cpu),
            memory_percent: None,
            temperature_celsius: None,
            uptime_seconds: None,
            collected_at: Some(Utc::now()),
        }
    }

    // cpu_threshold=80, hysteresis=5, sequence 75,82,79,78,74,81 raises
    // exactly once at 82 and clears exactly once at 74; the dead zone (79,
    // 78) between threshold and threshold-hysteresis emits nothing either
    // way.
    #[test]
    fn cpu_hysteresis_suppresses_flapping() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let sequence = [75.0, 82.0, 79.0, 78.0, 74.0, 81.0];
        let mut kinds = Vec::new();
        for cpu in sequence {
            for alarm in engine.evaluate_health("router1", &health(cpu)) {
                kinds.push(alarm.kind);
            }
        }
        assert_eq!(
            kinds,
            vec![AlarmKind::CpuHigh, AlarmKind::CpuNormal, AlarmKind::CpuHigh]
        );
    }

    // A health sample missing a field does not touch that field's alarm
    // state.
    #[test]
    fn missing_field_does_not_affect_other_metric_state() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        engine.evaluate_health(
            "router1",
            &HealthSample {
                device_id: Some(dev),
                cpu_percent: Some(90.0),
                memory_percent: None,
                temperature_celsius: None,
                uptime_seconds: None,
                collected_at: Some(Utc::now()),
            },
        );
        let alarms = engine.evaluate_health(
            "router1",
            &HealthSample {
                device_id: Some(dev),
                cpu_percent: None,
                memory_percent: Some(50.0),
                temperature_celsius: None,
                uptime_seconds: None,
                collected_at: Some(Utc::now()),
            },
        );
        // memory never crossed its threshold, and the missing cpu field
        // here must not spuriously clear the still-high cpu_high flag.
        assert!(alarms.is_empty());
    }

    // Reachability only alarms after the configured number of consecutive
    // failures, and only the Unreachable -> Reachable transition emits
    // device_reachable (not the initial Unknown -> Reachable transition).
    #[test]
    fn device_unreachable_after_threshold_failures_then_recovers() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);

        let first_success = engine.evaluate_reachability(dev, "router1", true);
        assert!(first_success.is_empty());

        assert!(engine.evaluate_reachability(dev, "router1", false).is_empty());
        assert!(engine.evaluate_reachability(dev, "router1", false).is_empty());
        let alarms = engine.evaluate_reachability(dev, "router1", false);
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].kind, AlarmKind::DeviceUnreachable);

        let recovery = engine.evaluate_reachability(dev, "router1", true);
        assert_eq!(recovery.len(), 1);
        assert_eq!(recovery[0].kind, AlarmKind::DeviceReachable);
    }

    #[test]
    fn forget_purges_state_so_next_observation_is_a_fresh_baseline() {
        let engine = AlarmEngine::new(AlarmThresholds::default());
        let dev = DeviceId(1);
        engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        engine.forget(dev);
        // After forget, the next down observation raises again as a "first"
        // observation rather than being suppressed as a repeat.
        let alarms = engine.evaluate_interface("router1", &iface(dev, AdminStatus::Up, OperStatus::Down));
        assert_eq!(alarms.len(), 1);
    }
}
