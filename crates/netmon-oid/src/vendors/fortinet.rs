use netmon_types::value::MappingKind;
use netmon_types::OidMapping;

/// FORTINET-FORTIGATE-MIB session/cpu/memory gauges.
pub fn mappings() -> Vec<OidMapping> {
    use MappingKind::*;
    vec![
        OidMapping::new(
            "1.3.6.1.4.1.12356.101.4.1.3.0",
            "cpu_usage",
            "fortinet",
            Gauge,
            Some("percent"),
        ),
        OidMapping::new(
            "1.3.6.1.4.1.12356.101.4.1.4.0",
            "memory_percent",
            "fortinet",
            Gauge,
            Some("percent"),
        ),
        OidMapping::new(
            "1.3.6.1.4.1.12356.101.4.1.8.0",
            "session_count",
            "fortinet",
            Gauge,
            None,
        ),
    ]
}
