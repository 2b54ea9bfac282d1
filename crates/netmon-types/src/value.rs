use std::net::Ipv4Addr;

/// Tagged union over the SNMP value types the session layer can return.
/// Decoders preserve raw counter values; rate computation is deliberately
/// not a session concern.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Integer(i64),
    Counter32(u32),
    Counter64(u64),
    Gauge(u32),
    TimeTicks(u32),
    OctetString(Vec<u8>),
    Oid(String),
    IpAddress(Ipv4Addr),
    Null,
}

impl TypedValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(v) => Some(*v),
            TypedValue::Gauge(v) | TypedValue::TimeTicks(v) | TypedValue::Counter32(v) => {
                Some(*v as i64)
            }
            TypedValue::Counter64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TypedValue::Counter64(v) => Some(*v),
            TypedValue::Counter32(v) | TypedValue::Gauge(v) | TypedValue::TimeTicks(v) => {
                Some(*v as u64)
            }
            TypedValue::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_utf8_lossy(&self) -> Option<String> {
        match self {
            TypedValue::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }
}

/// Declared shape of a mapped OID, used by the OID registry to decide how a
/// raw `TypedValue` should be coerced into a sample field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    Gauge,
    Counter,
    Enum,
    String,
}
