//! The vendor OID registry.
//!
//! Loaded once at start from a declarative, per-vendor catalog and immutable
//! thereafter: concurrent reads need no coordination. Adding a
//! vendor is purely a data change — push a new table into
//! [`OidRegistry::with_builtin_vendors`] or [`OidRegistry::register_vendor`].
//!
//! `oid` is the primary key across the *whole* registry: the IF-MIB/SNMPv2-MIB
//! mappings that are identical on every vendor's agent live under the
//! `generic` vendor table, while each vendor table only adds the
//! enterprise-specific OIDs it uniquely needs (CPU/memory/temperature
//! gauges). Callers that need "everything this device exposes" combine
//! `mappings_for("generic")` with `mappings_for(device.vendor_tag)` — see
//! [`OidRegistry::mappings_for_device`].

pub mod error;
pub mod vendors;

use std::collections::HashMap;

use netmon_types::{OidMapping, Vendor};

pub use error::UnknownMappingError;

#[derive(Debug, Clone)]
pub struct OidRegistry {
    by_oid: HashMap<String, OidMapping>,
    by_vendor_name: HashMap<(Vendor, String), OidMapping>,
    by_vendor: HashMap<Vendor, Vec<OidMapping>>,
}

impl OidRegistry {
    /// Empty registry with no vendors loaded; use [`register_vendor`] to
    /// populate it (e.g. in tests, or to load a custom catalog in place of
    /// the built-ins).
    ///
    /// [`register_vendor`]: OidRegistry::register_vendor
    pub fn new() -> Self {
        Self {
            by_oid: HashMap::new(),
            by_vendor_name: HashMap::new(),
            by_vendor: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the four built-in vendor tables: `generic`,
    /// `cisco`, `fortinet`, `mikrotik`.
    pub fn with_builtin_vendors() -> Self {
        let mut reg = Self::new();
        for mapping in vendors::generic::mappings() {
            reg.insert(mapping);
        }
        for mapping in vendors::cisco::mappings() {
            reg.insert(mapping);
        }
        for mapping in vendors::fortinet::mappings() {
            reg.insert(mapping);
        }
        for mapping in vendors::mikrotik::mappings() {
            reg.insert(mapping);
        }
        reg
    }

    /// Register every mapping in `table` under its own vendor. Adding a new
    /// vendor is a data-only change: build a `Vec<OidMapping>` and call this
    /// once at startup.
    ///
    /// # Panics
    /// Panics if `table` contains a duplicate `oid` or `(vendor,
    /// logical_name)` pair already present in the registry — that would
    /// violate this registry's uniqueness invariants and indicates a bug in
    /// the catalog, not a runtime condition to recover from.
    pub fn register_vendor(&mut self, table: Vec<OidMapping>) {
        for mapping in table {
            self.insert(mapping);
        }
    }

    fn insert(&mut self, mapping: OidMapping) {
        assert!(
            !self.by_oid.contains_key(&mapping.oid),
            "duplicate oid {} in catalog",
            mapping.oid
        );
        let key = (mapping.vendor.clone(), mapping.logical_name.clone());
        assert!(
            !self.by_vendor_name.contains_key(&key),
            "duplicate (vendor, logical_name) {:?} in catalog",
            key
        );
        self.by_vendor
            .entry(mapping.vendor.clone())
            .or_default()
            .push(mapping.clone());
        self.by_vendor_name.insert(key, mapping.clone());
        self.by_oid.insert(mapping.oid.clone(), mapping);
    }

    pub fn lookup_by_oid(&self, oid: &str) -> Result<&OidMapping, UnknownMappingError> {
        self.by_oid
            .get(oid)
            .ok_or_else(|| UnknownMappingError::Oid(oid.to_string()))
    }

    pub fn lookup(
        &self,
        vendor: &Vendor,
        logical_name: &str,
    ) -> Result<&OidMapping, UnknownMappingError> {
        self.by_vendor_name
            .get(&(vendor.clone(), logical_name.to_string()))
            .ok_or_else(|| UnknownMappingError::LogicalName {
                vendor: vendor.clone(),
                logical_name: logical_name.to_string(),
            })
    }

    /// All mappings registered directly under `vendor` (not including the
    /// `generic` table — see [`mappings_for_device`] for the combined view).
    ///
    /// [`mappings_for_device`]: OidRegistry::mappings_for_device
    pub fn mappings_for(&self, vendor: &Vendor) -> &[OidMapping] {
        self.by_vendor
            .get(vendor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The full set of OIDs a device tagged `vendor` exposes: the universal
    /// `generic` table plus whatever `vendor` itself adds. Returns
    /// [`UnknownMappingError::UnknownVendor`] if `vendor` has no entries of
    /// its own and isn't `generic`.
    pub fn mappings_for_device(
        &self,
        vendor: &Vendor,
    ) -> Result<Vec<&OidMapping>, UnknownMappingError> {
        let generic = Vendor::new("generic");
        if vendor != &generic && !self.by_vendor.contains_key(vendor) {
            return Err(UnknownMappingError::UnknownVendor(vendor.clone()));
        }
        let mut combined: Vec<&OidMapping> = self.mappings_for(&generic).iter().collect();
        if vendor != &generic {
            combined.extend(self.mappings_for(vendor).iter());
        }
        Ok(combined)
    }

    pub fn known_vendors(&self) -> impl Iterator<Item = &Vendor> {
        self.by_vendor.keys()
    }
}

impl Default for OidRegistry {
    fn default() -> Self {
        Self::with_builtin_vendors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netmon_types::value::MappingKind;

    #[test]
    fn builtin_vendors_are_loaded() {
        let reg = OidRegistry::with_builtin_vendors();
        let vendors: Vec<&str> = {
            let mut v: Vec<&str> = reg.known_vendors().map(Vendor::as_str).collect();
            v.sort();
            v
        };
        assert_eq!(vendors, vec!["cisco", "fortinet", "generic", "mikrotik"]);
    }

    #[test]
    fn lookup_by_oid_finds_generic_ifdescr() {
        let reg = OidRegistry::with_builtin_vendors();
        let mapping = reg.lookup_by_oid("1.3.6.1.2.1.2.2.1.2").unwrap();
        assert_eq!(mapping.logical_name, "if_descr");
        assert_eq!(mapping.vendor, Vendor::new("generic"));
    }

    #[test]
    fn lookup_by_oid_miss_is_unknown_mapping() {
        let reg = OidRegistry::with_builtin_vendors();
        let err = reg.lookup_by_oid("9.9.9.9").unwrap_err();
        assert!(matches!(err, UnknownMappingError::Oid(_)));
    }

    #[test]
    fn lookup_by_vendor_and_logical_name() {
        let reg = OidRegistry::with_builtin_vendors();
        let cisco = Vendor::new("cisco");
        let mapping = reg.lookup(&cisco, "cpu_usage").unwrap();
        assert_eq!(mapping.kind, MappingKind::Gauge);
        assert_eq!(mapping.unit.as_deref(), Some("percent"));
    }

    #[test]
    fn mappings_for_device_combines_generic_and_vendor() {
        let reg = OidRegistry::with_builtin_vendors();
        let fortinet = Vendor::new("fortinet");
        let combined = reg.mappings_for_device(&fortinet).unwrap();
        assert!(combined.iter().any(|m| m.logical_name == "if_descr"));
        assert!(combined.iter().any(|m| m.logical_name == "cpu_usage"));
    }

    #[test]
    fn mappings_for_device_unknown_vendor_errors() {
        let reg = OidRegistry::with_builtin_vendors();
        let ghost = Vendor::new("ghostcorp");
        let err = reg.mappings_for_device(&ghost).unwrap_err();
        assert!(matches!(err, UnknownMappingError::UnknownVendor(_)));
    }

    #[test]
    fn each_vendor_has_at_most_one_definition_per_logical_name() {
        let reg = OidRegistry::with_builtin_vendors();
        for vendor in reg.known_vendors() {
            let mappings = reg.mappings_for(vendor);
            let mut seen = std::collections::HashSet::new();
            for m in mappings {
                assert!(
                    seen.insert(&m.logical_name),
                    "duplicate logical name {} under vendor {}",
                    m.logical_name,
                    vendor
                );
            }
        }
    }
}
