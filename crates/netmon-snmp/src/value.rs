use netmon_types::TypedValue;
use snmp2::Value;

use crate::oid::oid_to_string;

/// Convert a decoded `snmp2::Value` into our tagged `TypedValue`. Returns
/// `None` for the end-of-data sentinels (`EndOfMibView`, `NoSuchObject`,
/// `NoSuchInstance`) — callers translate those into `SnmpError::NoSuchName`
/// or simply stop walking, never into a sample field.
pub fn from_snmp2(value: &Value) -> Option<TypedValue> {
    match value {
        Value::Integer(n) => Some(TypedValue::Integer(*n)),
        Value::OctetString(bytes) => Some(TypedValue::OctetString(bytes.to_vec())),
        Value::ObjectIdentifier(oid) => Some(TypedValue::Oid(oid_to_string(oid))),
        Value::IpAddress(octets) => Some(TypedValue::IpAddress(std::net::Ipv4Addr::new(
            octets[0], octets[1], octets[2], octets[3],
        ))),
        Value::Counter32(n) => Some(TypedValue::Counter32(*n)),
        Value::Unsigned32(n) => Some(TypedValue::Gauge(*n)),
        Value::Timeticks(n) => Some(TypedValue::TimeTicks(*n)),
        Value::Counter64(n) => Some(TypedValue::Counter64(*n)),
        Value::Null => Some(TypedValue::Null),
        Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => None,
        _ => None,
    }
}
