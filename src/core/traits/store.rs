//! Relational store collaborator

use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Row-limited read access to the booking database
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Select at most `limit` rows of `columns` from `table`
    async fn select(&self, table: &str, columns: &str, limit: usize) -> Result<Vec<Value>>;

    /// Rows of `table` whose `foreign_key` matches no row id in `referenced_table`
    async fn find_orphans(
        &self,
        table: &str,
        foreign_key: &str,
        referenced_table: &str,
        limit: usize,
    ) -> Result<Vec<Value>>;

    /// Invoke a stored procedure
    ///
    /// Returns `Ok(None)` when the procedure does not exist on this store.
    async fn call_procedure(&self, name: &str, args: Value) -> Result<Option<Value>>;
}
