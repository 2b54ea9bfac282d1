use std::fmt;

/// Opaque, stable device identifier. Stable for the lifetime of the process
/// once a device is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DeviceId {
    fn from(v: u64) -> Self {
        DeviceId(v)
    }
}

/// Vendor tag, normalized to lowercase so registry lookups are case-insensitive
/// without callers having to remember to normalize themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct Vendor(String);

impl Vendor {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Vendor(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Deserializing through `Vendor::new` rather than deriving keeps a
// `vendor_tag: Cisco` in config on the same footing as a hand-built
// `Vendor::new("cisco")` — both land in the lowercase-keyed registry maps.
impl<'de> serde::Deserialize<'de> for Vendor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Vendor::new(raw))
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: AsRef<str>> From<S> for Vendor {
    fn from(raw: S) -> Self {
        Vendor::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_deserializes_through_lowercase_normalization() {
        let vendor: Vendor = serde_json::from_str("\"Cisco\"").unwrap();
        assert_eq!(vendor, Vendor::new("cisco"));
    }
}
