use std::collections::HashMap;
use std::sync::RwLock;

use netmon_oid::OidRegistry;
use netmon_types::{DeviceConfig, DeviceId};

use crate::error::OrchestratorError;

/// Administrative device table: exclusive access for add/remove/enable,
/// shared access for pollers reading one device's config for the duration
/// of a poll.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, DeviceConfig>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects a duplicate `device_id`, and rejects a `vendor_tag` the OID
    /// registry has no mapping for at all — surfacing that mistake to the
    /// administrative caller synchronously rather than letting it through to
    /// become an ordinary per-tier poll failure later.
    pub fn register_device(
        &self,
        config: DeviceConfig,
        oid_registry: &OidRegistry,
    ) -> Result<(), OrchestratorError> {
        oid_registry.mappings_for_device(&config.vendor_tag)?;

        let mut devices = self.devices.write().unwrap();
        if devices.contains_key(&config.device_id) {
            return Err(OrchestratorError::AlreadyRegistered(config.device_id));
        }
        devices.insert(config.device_id, config);
        Ok(())
    }

    pub fn deregister_device(&self, id: DeviceId) -> Result<DeviceConfig, OrchestratorError> {
        self.devices
            .write()
            .unwrap()
            .remove(&id)
            .ok_or(OrchestratorError::UnknownDevice(id))
    }

    pub fn enable_device(&self, id: DeviceId, enabled: bool) -> Result<(), OrchestratorError> {
        let mut devices = self.devices.write().unwrap();
        let device = devices
            .get_mut(&id)
            .ok_or(OrchestratorError::UnknownDevice(id))?;
        device.enabled = enabled;
        Ok(())
    }

    pub fn get(&self, id: DeviceId) -> Result<DeviceConfig, OrchestratorError> {
        self.devices
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(OrchestratorError::UnknownDevice(id))
    }

    pub fn list_devices(&self) -> Vec<DeviceConfig> {
        self.devices.read().unwrap().values().cloned().collect()
    }

    pub fn enabled_device_ids(&self) -> Vec<DeviceId> {
        self.devices
            .read()
            .unwrap()
            .values()
            .filter(|d| d.enabled)
            .map(|d| d.device_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use netmon_types::{TierIntervals, TransportCredentials, Vendor};

    use super::*;

    fn device(id: u64) -> DeviceConfig {
        DeviceConfig {
            device_id: DeviceId(id),
            name: format!("dev-{id}"),
            address: "192.0.2.1".to_string(),
            credentials: TransportCredentials::V2c {
                community: "public".to_string(),
            },
            vendor_tag: Vendor::new("generic"),
            enabled: true,
            tier_intervals: TierIntervals::default(),
        }
    }

    #[test]
    fn register_then_list_roundtrips() {
        let registry = DeviceRegistry::new();
        let oids = OidRegistry::with_builtin_vendors();
        registry.register_device(device(1), &oids).unwrap();
        assert_eq!(registry.list_devices().len(), 1);
    }

    #[test]
    fn double_register_is_rejected() {
        let registry = DeviceRegistry::new();
        let oids = OidRegistry::with_builtin_vendors();
        registry.register_device(device(1), &oids).unwrap();
        let err = registry.register_device(device(1), &oids).unwrap_err();
        assert!(matches!(err, OrchestratorError::AlreadyRegistered(_)));
    }

    #[test]
    fn unknown_vendor_tag_is_rejected_at_registration() {
        let registry = DeviceRegistry::new();
        let oids = OidRegistry::with_builtin_vendors();
        let mut config = device(1);
        config.vendor_tag = Vendor::new("ghostcorp");
        let err = registry.register_device(config, &oids).unwrap_err();
        assert!(matches!(err, OrchestratorError::Oid(_)));
        assert!(registry.list_devices().is_empty());
    }

    #[test]
    fn deregister_unknown_device_errors() {
        let registry = DeviceRegistry::new();
        let err = registry.deregister_device(DeviceId(99)).unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownDevice(_)));
    }

    #[test]
    fn enable_device_flips_flag() {
        let registry = DeviceRegistry::new();
        let oids = OidRegistry::with_builtin_vendors();
        registry.register_device(device(1), &oids).unwrap();
        registry.enable_device(DeviceId(1), false).unwrap();
        assert!(!registry.get(DeviceId(1)).unwrap().enabled);
        assert!(registry.enabled_device_ids().is_empty());
    }
}
