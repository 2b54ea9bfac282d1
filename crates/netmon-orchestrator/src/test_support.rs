//! In-memory [`SnmpSession`] double for orchestrator tests. Not compiled
//! into non-test builds.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use netmon_snmp::{SnmpError, SnmpSession};
use netmon_types::TypedValue;

/// Answers `get`/`walk` from a fixed table instead of talking to a device.
/// `get` on an oid with no entry returns `NoSuchName`, matching a real
/// agent's response for an OID it doesn't expose.
#[derive(Default)]
pub struct FakeSnmpSession {
    gets: Mutex<HashMap<String, TypedValue>>,
    walks: Mutex<HashMap<String, Vec<(String, TypedValue)>>>,
}

impl FakeSnmpSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(self, oid: impl Into<String>, value: TypedValue) -> Self {
        self.gets.lock().unwrap().insert(oid.into(), value);
        self
    }

    pub fn with_walk(self, subtree_oid: impl Into<String>, rows: Vec<(String, TypedValue)>) -> Self {
        self.walks.lock().unwrap().insert(subtree_oid.into(), rows);
        self
    }
}

#[async_trait]
impl SnmpSession for FakeSnmpSession {
    async fn get(&self, oid: &str) -> Result<TypedValue, SnmpError> {
        self.gets
            .lock()
            .unwrap()
            .get(oid)
            .cloned()
            .ok_or_else(|| SnmpError::NoSuchName(oid.to_string()))
    }

    async fn get_next(&self, oid: &str) -> Result<(String, TypedValue), SnmpError> {
        Err(SnmpError::NoSuchName(oid.to_string()))
    }

    async fn walk(&self, subtree_oid: &str) -> Result<Vec<(String, TypedValue)>, SnmpError> {
        Ok(self
            .walks
            .lock()
            .unwrap()
            .get(subtree_oid)
            .cloned()
            .unwrap_or_default())
    }

    async fn bulk_walk(
        &self,
        subtree_oid: &str,
        _max_repetitions: u32,
    ) -> Result<Vec<(String, TypedValue)>, SnmpError> {
        self.walk(subtree_oid).await
    }
}
