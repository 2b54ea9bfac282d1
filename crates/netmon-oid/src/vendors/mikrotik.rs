use netmon_types::value::MappingKind;
use netmon_types::OidMapping;

/// MikroTik RouterOS health gauges, from the HOST-RESOURCES-MIB processor
/// table and the `mtxrHealth` enterprise branch.
pub fn mappings() -> Vec<OidMapping> {
    use MappingKind::*;
    vec![
        OidMapping::new(
            "1.3.6.1.2.1.25.3.3.1.2.1",
            "cpu_usage",
            "mikrotik",
            Gauge,
            Some("percent"),
        ),
        OidMapping::new(
            "1.3.6.1.4.1.14988.1.1.3.10.0",
            "temperature_celsius",
            "mikrotik",
            Gauge,
            Some("celsius"),
        ),
        OidMapping::new(
            "1.3.6.1.4.1.14988.1.1.3.11.0",
            "memory_percent",
            "mikrotik",
            Gauge,
            Some("percent"),
        ),
    ]
}
