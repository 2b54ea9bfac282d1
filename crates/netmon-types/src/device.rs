use std::time::Duration;

use crate::ids::{DeviceId, Vendor};

/// One of the three independent polling cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollTier {
    Interfaces,
    Health,
    Inventory,
}

impl PollTier {
    pub const ALL: [PollTier; 3] = [PollTier::Interfaces, PollTier::Health, PollTier::Inventory];

    pub fn as_str(&self) -> &'static str {
        match self {
            PollTier::Interfaces => "interfaces",
            PollTier::Health => "health",
            PollTier::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for PollTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-tier poll interval, in seconds, defaulted below unless overridden
/// per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TierIntervals {
    pub interfaces_secs: u64,
    pub health_secs: u64,
    pub inventory_secs: u64,
}

impl TierIntervals {
    pub fn get(&self, tier: PollTier) -> Duration {
        let secs = match tier {
            PollTier::Interfaces => self.interfaces_secs,
            PollTier::Health => self.health_secs,
            PollTier::Inventory => self.inventory_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for TierIntervals {
    fn default() -> Self {
        Self {
            interfaces_secs: 30,
            health_secs: 300,
            inventory_secs: 3_600,
        }
    }
}

/// SNMP transport credentials.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "version", rename_all = "snake_case")]
pub enum TransportCredentials {
    V2c {
        community: String,
    },
    V3 {
        user: String,
        auth: Option<UsmAuth>,
        privacy: Option<UsmPrivacy>,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProtocol {
    Md5,
    Sha1,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UsmAuth {
    pub protocol: AuthProtocol,
    /// Name of an environment variable holding the auth passphrase; never
    /// the passphrase itself. Configuration never stores secrets in
    /// plaintext.
    pub passphrase_env: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivProtocol {
    Des,
    Aes,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UsmPrivacy {
    pub protocol: PrivProtocol,
    pub passphrase_env: String,
}

/// Device registration record, owned exclusively by the polling orchestrator
/// and mutated only through its administrative operations.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeviceConfig {
    pub device_id: DeviceId,
    pub name: String,
    pub address: String,
    pub credentials: TransportCredentials,
    pub vendor_tag: Vendor,
    pub enabled: bool,
    pub tier_intervals: TierIntervals,
}
