use thiserror::Error;

use crate::ids::Vendor;

/// Normalization-layer errors. These are logged and treated as an absent
/// field — they never propagate as a hard failure of a poll cycle.
#[derive(Debug, Error, Clone)]
pub enum NormalizationError {
    #[error("no mapping for oid {oid} under vendor {vendor}")]
    UnknownMapping { oid: String, vendor: Vendor },

    #[error("no mapping for logical name {logical_name} under vendor {vendor}")]
    UnknownLogicalName { logical_name: String, vendor: Vendor },

    #[error("value for {logical_name} did not coerce to the expected field type")]
    DecodeCoercion { logical_name: String },
}
