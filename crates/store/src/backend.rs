//! The table-backend seam.
//!
//! Everything the application needs from the remote store fits in six
//! operations: select, insert, update, delete, upsert-on-conflict, and
//! one remote procedure call. Repositories are written against this
//! trait; [`crate::HttpBackend`] speaks to the hosted store and
//! [`crate::MemoryBackend`] serves tests and offline development.

use crate::error::StoreResult;
use crate::query::Query;
use serde_json::Value;

#[async_trait::async_trait]
pub trait TableBackend: Send + Sync {
    /// Select rows matching `query`, honouring its order and limit.
    async fn select(&self, table: &str, query: &Query) -> StoreResult<Vec<Value>>;

    /// Insert the given rows and return them as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>>;

    /// Apply `patch` to every row matching `query` and return the updated rows.
    async fn update(&self, table: &str, query: &Query, patch: Value) -> StoreResult<Vec<Value>>;

    /// Delete every row matching `query` and return how many were removed.
    async fn delete(&self, table: &str, query: &Query) -> StoreResult<u64>;

    /// Insert `row`, or merge it into the existing row whose
    /// `conflict_column` matches. Returns the resulting row.
    async fn upsert(&self, table: &str, conflict_column: &str, row: Value) -> StoreResult<Value>;

    /// Invoke a server-side procedure with JSON arguments.
    async fn rpc(&self, function: &str, args: Value) -> StoreResult<Value>;
}
