use netmon_types::value::MappingKind;
use netmon_types::OidMapping;

/// Standard IF-MIB / SNMPv2-MIB mappings shared by every SNMP-speaking
/// device regardless of vendor.
pub fn mappings() -> Vec<OidMapping> {
    use MappingKind::*;
    vec![
        OidMapping::new("1.3.6.1.2.1.2.2.1.2", "if_descr", "generic", String, None),
        OidMapping::new("1.3.6.1.2.1.2.2.1.7", "if_admin_status", "generic", Enum, None),
        OidMapping::new("1.3.6.1.2.1.2.2.1.8", "if_oper_status", "generic", Enum, None),
        OidMapping::new("1.3.6.1.2.1.2.2.1.5", "if_speed", "generic", Gauge, Some("bps")),
        OidMapping::new(
            "1.3.6.1.2.1.2.2.1.10",
            "if_in_octets",
            "generic",
            Counter,
            Some("octets"),
        ),
        OidMapping::new(
            "1.3.6.1.2.1.2.2.1.16",
            "if_out_octets",
            "generic",
            Counter,
            Some("octets"),
        ),
        OidMapping::new(
            "1.3.6.1.2.1.1.3.0",
            "uptime_seconds",
            "generic",
            Counter,
            Some("centiseconds"),
        ),
        OidMapping::new("1.3.6.1.2.1.1.1.0", "sys_descr", "generic", String, None),
        OidMapping::new(
            "1.3.6.1.2.1.47.1.1.1.1.11.1",
            "serial_number",
            "generic",
            String,
            None,
        ),
        OidMapping::new(
            "1.3.6.1.2.1.47.1.1.1.1.9.1",
            "firmware_version",
            "generic",
            String,
            None,
        ),
    ]
}
