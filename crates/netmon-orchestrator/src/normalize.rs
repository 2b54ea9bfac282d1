//! Turns raw SNMP responses into the typed samples the alarm engine and sink
//! consume: the registry says *which* OID means *what*, this module says how
//! to shape the resulting values into
//! `InterfaceSample`/`HealthSample`/`InventorySample`.

use chrono::Utc;
use netmon_oid::OidRegistry;
use netmon_snmp::{SnmpError, SnmpSession};
use netmon_types::{
    AdminStatus, DeviceConfig, HealthSample, InventorySample, NormalizationError, OidMapping,
    OperStatus, TypedValue,
};
use tracing::warn;

use crate::error::OrchestratorError;

fn find_oid<'a>(mappings: &'a [&'a OidMapping], logical_name: &str) -> Option<&'a str> {
    mappings
        .iter()
        .find(|m| m.logical_name == logical_name)
        .map(|m| m.oid.as_str())
}

/// Index appended to a table OID by the agent (e.g. `...1.2.2.1.2.<if_index>`).
/// Only single-scalar-index tables are supported; composite indexes are out
/// of scope for this engine (IF-MIB/enterprise health tables are all
/// single-indexed by ifIndex or a fixed slot number).
fn table_index(resp_oid: &str, subtree_oid: &str) -> Option<u32> {
    resp_oid
        .strip_prefix(subtree_oid)?
        .strip_prefix('.')?
        .parse()
        .ok()
}

/// Poll the interfaces tier: one `InterfaceSample` per row the agent's IF-MIB
/// table exposes, joined across the table columns by trailing `ifIndex`.
pub async fn poll_interfaces(
    session: &dyn SnmpSession,
    registry: &OidRegistry,
    device: &DeviceConfig,
) -> Result<Vec<netmon_types::InterfaceSample>, OrchestratorError> {
    let mappings = registry.mappings_for_device(&device.vendor_tag)?;

    let descr_oid = find_oid(&mappings, "if_descr")
        .ok_or_else(|| OrchestratorError::MissingMapping("if_descr".into()))?;
    let admin_oid = find_oid(&mappings, "if_admin_status")
        .ok_or_else(|| OrchestratorError::MissingMapping("if_admin_status".into()))?;
    let oper_oid = find_oid(&mappings, "if_oper_status")
        .ok_or_else(|| OrchestratorError::MissingMapping("if_oper_status".into()))?;
    let speed_oid = find_oid(&mappings, "if_speed");
    let in_oid = find_oid(&mappings, "if_in_octets");
    let out_oid = find_oid(&mappings, "if_out_octets");

    let descr_rows = session.walk(descr_oid).await?;
    let admin_rows = session.walk(admin_oid).await?;
    let oper_rows = session.walk(oper_oid).await?;
    let speed_rows = match speed_oid {
        Some(oid) => session.walk(oid).await?,
        None => Vec::new(),
    };
    let in_rows = match in_oid {
        Some(oid) => session.walk(oid).await?,
        None => Vec::new(),
    };
    let out_rows = match out_oid {
        Some(oid) => session.walk(oid).await?,
        None => Vec::new(),
    };

    let now = Utc::now();
    let mut samples = Vec::with_capacity(descr_rows.len());

    for (resp_oid, value) in &descr_rows {
        let Some(if_index) = table_index(resp_oid, descr_oid) else {
            continue;
        };
        let name = value.as_utf8_lossy().unwrap_or_default();

        let admin_status = lookup_indexed(&admin_rows, admin_oid, if_index)
            .and_then(|v| v.as_i64())
            .and_then(AdminStatus::from_ifmib)
            .unwrap_or(AdminStatus::Down);
        let oper_status = lookup_indexed(&oper_rows, oper_oid, if_index)
            .and_then(|v| v.as_i64())
            .map(OperStatus::from_ifmib)
            .unwrap_or(OperStatus::Unknown);
        let speed_bps = speed_oid.and_then(|oid| lookup_indexed(&speed_rows, oid, if_index))
            .and_then(|v| v.as_u64());
        let in_octets = in_oid
            .and_then(|oid| lookup_indexed(&in_rows, oid, if_index))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let out_octets = out_oid
            .and_then(|oid| lookup_indexed(&out_rows, oid, if_index))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        samples.push(netmon_types::InterfaceSample {
            device_id: device.device_id,
            if_index,
            name,
            description: None,
            admin_status,
            oper_status,
            speed_bps,
            in_octets,
            out_octets,
            collected_at: now,
        });
    }

    Ok(samples)
}

fn lookup_indexed<'a>(
    rows: &'a [(String, TypedValue)],
    subtree_oid: &str,
    if_index: u32,
) -> Option<&'a TypedValue> {
    rows.iter().find_map(|(oid, value)| {
        (table_index(oid, subtree_oid) == Some(if_index)).then_some(value)
    })
}

/// Poll the health tier: point-gets for whichever gauges `device`'s vendor
/// mapping defines. A `NoSuchName` on any one gauge leaves that field `None`
/// rather than failing the whole sample — a device not exposing a given
/// gauge is normal, not an error.
pub async fn poll_health(
    session: &dyn SnmpSession,
    registry: &OidRegistry,
    device: &DeviceConfig,
) -> Result<HealthSample, OrchestratorError> {
    let mappings = registry.mappings_for_device(&device.vendor_tag)?;

    let cpu_percent =
        get_optional_percent(session, find_oid(&mappings, "cpu_usage"), "cpu_usage").await?;
    let memory_percent = get_optional_percent(
        session,
        find_oid(&mappings, "memory_percent"),
        "memory_percent",
    )
    .await?;
    // Temperature has no [0, 100] bound, unlike the two percent gauges above,
    // so it takes the raw gauge path rather than `get_optional_percent`.
    let temperature_celsius = get_optional_gauge(
        session,
        find_oid(&mappings, "temperature_celsius"),
        "temperature_celsius",
    )
    .await?;
    let uptime_seconds = match find_oid(&mappings, "uptime_seconds") {
        Some(oid) => match session.get(oid).await {
            Ok(value) => value.as_u64().map(|centiseconds| centiseconds / 100),
            Err(SnmpError::NoSuchName(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    Ok(HealthSample {
        device_id: Some(device.device_id),
        cpu_percent,
        memory_percent,
        temperature_celsius,
        uptime_seconds,
        collected_at: Some(Utc::now()),
    })
}

/// Percent gauges (`cpu_percent`/`memory_percent`) are clamped to `[0, 100]`
/// on read.
async fn get_optional_percent(
    session: &dyn SnmpSession,
    oid: Option<&str>,
    logical_name: &str,
) -> Result<Option<f64>, OrchestratorError> {
    Ok(get_optional_gauge(session, oid, logical_name)
        .await?
        .map(HealthSample::clamp_percent))
}

/// Unbounded gauge read: coercion failures (a present value of the wrong
/// shape, as opposed to a legitimate `NoSuchName`) are logged and treated as
/// an absent field rather than failing the poll.
async fn get_optional_gauge(
    session: &dyn SnmpSession,
    oid: Option<&str>,
    logical_name: &str,
) -> Result<Option<f64>, OrchestratorError> {
    let Some(oid) = oid else {
        return Ok(None);
    };
    match session.get(oid).await {
        Ok(value) => match value.as_i64() {
            Some(raw) => Ok(Some(raw as f64)),
            None => {
                let err = NormalizationError::DecodeCoercion {
                    logical_name: logical_name.to_string(),
                };
                warn!(logical_name, value = ?value, "{err}");
                Ok(None)
            }
        },
        Err(SnmpError::NoSuchName(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use netmon_oid::OidRegistry;
    use netmon_types::{DeviceId, TierIntervals, TransportCredentials, Vendor};

    use super::*;
    use crate::test_support::FakeSnmpSession;

    fn device(vendor: &str) -> DeviceConfig {
        DeviceConfig {
            device_id: DeviceId(1),
            name: "router1".to_string(),
            address: "192.0.2.1".to_string(),
            credentials: TransportCredentials::V2c { community: "public".to_string() },
            vendor_tag: Vendor::new(vendor),
            enabled: true,
            tier_intervals: TierIntervals::default(),
        }
    }

    const CISCO_CPU_OID: &str = "1.3.6.1.4.1.9.9.109.1.1.1.1.5";
    const CISCO_TEMPERATURE_OID: &str = "1.3.6.1.4.1.9.9.13.1.3.1.3";

    #[tokio::test]
    async fn poll_health_does_not_clamp_temperature_out_of_range() {
        let registry = OidRegistry::with_builtin_vendors();
        let device = device("cisco");
        let session = FakeSnmpSession::new().with_get(CISCO_TEMPERATURE_OID, TypedValue::Integer(105));

        let sample = poll_health(&session, &registry, &device).await.unwrap();
        assert_eq!(sample.temperature_celsius, Some(105.0));
        assert_eq!(sample.cpu_percent, None);
    }

    #[tokio::test]
    async fn poll_health_clamps_cpu_percent_into_0_100() {
        let registry = OidRegistry::with_builtin_vendors();
        let device = device("cisco");
        let session = FakeSnmpSession::new().with_get(CISCO_CPU_OID, TypedValue::Integer(150));

        let sample = poll_health(&session, &registry, &device).await.unwrap();
        assert_eq!(sample.cpu_percent, Some(100.0));
    }

    #[tokio::test]
    async fn gauge_coercion_failure_on_wrong_shaped_value_is_treated_as_absent() {
        let registry = OidRegistry::with_builtin_vendors();
        let device = device("cisco");
        // cpu_usage OID present but holding a non-numeric value: a coercion
        // failure, distinct from the field simply being absent.
        let session = FakeSnmpSession::new()
            .with_get(CISCO_CPU_OID, TypedValue::OctetString(b"not a number".to_vec()));

        let sample = poll_health(&session, &registry, &device).await.unwrap();
        assert_eq!(sample.cpu_percent, None);
    }

    #[tokio::test]
    async fn poll_interfaces_joins_table_columns_by_if_index() {
        let registry = OidRegistry::with_builtin_vendors();
        let device = device("generic");
        let session = FakeSnmpSession::new()
            .with_walk(
                "1.3.6.1.2.1.2.2.1.2",
                vec![("1.3.6.1.2.1.2.2.1.2.1".to_string(), TypedValue::OctetString(b"Gi0/1".to_vec()))],
            )
            .with_walk(
                "1.3.6.1.2.1.2.2.1.7",
                vec![("1.3.6.1.2.1.2.2.1.7.1".to_string(), TypedValue::Integer(1))],
            )
            .with_walk(
                "1.3.6.1.2.1.2.2.1.8",
                vec![("1.3.6.1.2.1.2.2.1.8.1".to_string(), TypedValue::Integer(1))],
            );

        let samples = poll_interfaces(&session, &registry, &device).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].if_index, 1);
        assert_eq!(samples[0].name, "Gi0/1");
        assert_eq!(samples[0].admin_status, AdminStatus::Up);
        assert_eq!(samples[0].oper_status, OperStatus::Up);
    }
}

/// Poll the inventory tier: point-gets for sysDescr/serial/firmware.
pub async fn poll_inventory(
    session: &dyn SnmpSession,
    registry: &OidRegistry,
    device: &DeviceConfig,
) -> Result<InventorySample, OrchestratorError> {
    let mappings = registry.mappings_for_device(&device.vendor_tag)?;

    let system_description =
        get_optional_string(session, find_oid(&mappings, "sys_descr"), "sys_descr").await?;
    let serial =
        get_optional_string(session, find_oid(&mappings, "serial_number"), "serial_number").await?;
    let firmware_version = get_optional_string(
        session,
        find_oid(&mappings, "firmware_version"),
        "firmware_version",
    )
    .await?;

    Ok(InventorySample {
        device_id: device.device_id,
        system_description,
        serial,
        firmware_version,
        collected_at: Utc::now(),
    })
}

async fn get_optional_string(
    session: &dyn SnmpSession,
    oid: Option<&str>,
    logical_name: &str,
) -> Result<Option<String>, OrchestratorError> {
    let Some(oid) = oid else {
        return Ok(None);
    };
    match session.get(oid).await {
        Ok(value) => match value.as_utf8_lossy() {
            Some(s) => Ok(Some(s)),
            None => {
                let err = NormalizationError::DecodeCoercion {
                    logical_name: logical_name.to_string(),
                };
                warn!(logical_name, value = ?value, "{err}");
                Ok(None)
            }
        },
        Err(SnmpError::NoSuchName(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
