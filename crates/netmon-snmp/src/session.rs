use async_trait::async_trait;
use netmon_types::TypedValue;

use crate::error::SnmpError;

/// One session handle per device. Implementations enforce the timeout/retry
/// policy internally; callers only see the classified result.
///
/// `walk`/`bulk_walk` return an owned, already-materialized sequence rather
/// than a true lazy iterator: the walk is a finite, non-restartable sequence
/// built by a single forward pass and consumed once by the caller, and an
/// owned `Vec` is far simpler to reason about across an `async fn` boundary
/// than a borrowed streaming iterator would be. See DESIGN.md for the
/// recorded Open Question resolution.
#[async_trait]
pub trait SnmpSession: Send + Sync {
    async fn get(&self, oid: &str) -> Result<TypedValue, SnmpError>;

    async fn get_next(&self, oid: &str) -> Result<(String, TypedValue), SnmpError>;

    async fn walk(&self, subtree_oid: &str) -> Result<Vec<(String, TypedValue)>, SnmpError>;

    async fn bulk_walk(
        &self,
        subtree_oid: &str,
        max_repetitions: u32,
    ) -> Result<Vec<(String, TypedValue)>, SnmpError>;
}
