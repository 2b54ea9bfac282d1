use crate::ids::Vendor;
use crate::value::MappingKind;

/// Immutable normalization entry: numeric OID <-> (vendor, logical name).
///
/// `oid` is the primary key; `(vendor, logical_name)` is also unique within
/// a loaded registry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OidMapping {
    pub oid: String,
    pub logical_name: String,
    pub vendor: Vendor,
    pub kind: MappingKind,
    pub unit: Option<String>,
}

impl OidMapping {
    pub fn new(
        oid: impl Into<String>,
        logical_name: impl Into<String>,
        vendor: impl Into<Vendor>,
        kind: MappingKind,
        unit: Option<&str>,
    ) -> Self {
        Self {
            oid: oid.into(),
            logical_name: logical_name.into(),
            vendor: vendor.into(),
            kind,
            unit: unit.map(str::to_string),
        }
    }
}
