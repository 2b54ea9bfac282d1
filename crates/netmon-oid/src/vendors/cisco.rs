use netmon_types::value::MappingKind;
use netmon_types::OidMapping;

/// CISCO-PROCESS-MIB / CISCO-MEMORY-POOL-MIB / CISCO-ENVMON-MIB health
/// mappings. Inventory and interface mappings are inherited
/// from the `generic` table by the device's configured vendor tag falling
/// back to IF-MIB/SNMPv2-MIB, which every Cisco IOS/IOS-XE agent also
/// implements, so only the health gauges are vendor-specific here.
pub fn mappings() -> Vec<OidMapping> {
    use MappingKind::*;
    vec![
        OidMapping::new(
            "1.3.6.1.4.1.9.9.109.1.1.1.1.5",
            "cpu_usage",
            "cisco",
            Gauge,
            Some("percent"),
        ),
        OidMapping::new(
            "1.3.6.1.4.1.9.9.48.1.1.1.5",
            "memory_percent",
            "cisco",
            Gauge,
            Some("percent"),
        ),
        OidMapping::new(
            "1.3.6.1.4.1.9.9.13.1.3.1.3",
            "temperature_celsius",
            "cisco",
            Gauge,
            Some("celsius"),
        ),
    ]
}
