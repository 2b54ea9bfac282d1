use snmp2::ObjectIdentifier;

use crate::error::SnmpError;

pub fn parse_oid(raw: &str) -> Result<ObjectIdentifier, SnmpError> {
    raw.parse()
        .map_err(|_| SnmpError::Decode(format!("invalid oid: {raw}")))
}

pub fn oid_to_string(oid: &ObjectIdentifier) -> String {
    oid.to_string()
}

pub fn oid_starts_with(candidate: &ObjectIdentifier, subtree: &ObjectIdentifier) -> bool {
    let candidate = oid_to_string(candidate);
    let subtree = oid_to_string(subtree);
    candidate == subtree || candidate.starts_with(&format!("{subtree}."))
}
