//! In-memory relational store of JSON rows

use crate::core::traits::RelationalStore;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Rows per table
pub type Tables = HashMap<String, Vec<Value>>;

/// Stored procedure: reads the tables and the call arguments
pub type Procedure = Arc<dyn Fn(&Tables, &Value) -> Result<Value> + Send + Sync>;

/// Relational store holding every table in memory
///
/// Tables are created on first insert. Selecting from an unknown table is an
/// error, like querying a missing relation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    procedures: Arc<RwLock<HashMap<String, Procedure>>>,
    /// Injected failures by table
    failures: Arc<RwLock<HashMap<String, String>>>,
    latency: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        let sizes: HashMap<&str, usize> = tables.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("InMemoryStore")
            .field("tables", &sizes)
            .field("procedures", &self.procedures.read().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `table` without rows
    pub fn create_table(&self, table: &str) {
        self.tables.write().entry(table.to_string()).or_default();
    }

    pub fn insert(&self, table: &str, row: Value) {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Remove the rows of `table` whose `id` equals `id`; returns the number removed
    pub fn delete(&self, table: &str, id: &Value) -> usize {
        let mut tables = self.tables.write();
        let Some(rows) = tables.get_mut(table) else {
            return 0;
        };
        let before = rows.len();
        rows.retain(|row| row.get("id") != Some(id));
        before - rows.len()
    }

    /// All rows of `table`
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    pub fn register_procedure(&self, name: impl Into<String>, procedure: Procedure) {
        self.procedures.write().insert(name.into(), procedure);
    }

    /// Make every query against `table` fail with `message`
    pub fn fail_table(&self, table: &str, message: impl Into<String>) {
        self.failures.write().insert(table.to_string(), message.into());
    }

    pub fn clear_failures(&self) {
        self.failures.write().clear();
    }

    /// Delay every query by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write() = latency;
    }

    async fn before_query(&self, table: &str) -> Result<()> {
        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = self.failures.read().get(table) {
            return Err(MonitorError::database(message.clone()));
        }
        Ok(())
    }
}

/// Keep only `columns` of `row`; `*` keeps everything
fn project(row: &Value, columns: &[&str]) -> Value {
    if columns.contains(&"*") {
        return row.clone();
    }
    let Some(object) = row.as_object() else {
        return row.clone();
    };

    let projected: Map<String, Value> = columns
        .iter()
        .filter_map(|column| object.get(*column).map(|v| (column.to_string(), v.clone())))
        .collect();
    Value::Object(projected)
}

fn missing_table(table: &str) -> MonitorError {
    MonitorError::database(format!("relation \"{}\" does not exist", table))
}

#[async_trait]
impl RelationalStore for InMemoryStore {
    async fn select(&self, table: &str, columns: &str, limit: usize) -> Result<Vec<Value>> {
        self.before_query(table).await?;

        let columns: Vec<&str> = columns.split(',').map(str::trim).collect();
        let tables = self.tables.read();
        let rows = tables.get(table).ok_or_else(|| missing_table(table))?;

        Ok(rows.iter().take(limit).map(|row| project(row, &columns)).collect())
    }

    async fn find_orphans(
        &self,
        table: &str,
        foreign_key: &str,
        referenced_table: &str,
        limit: usize,
    ) -> Result<Vec<Value>> {
        self.before_query(table).await?;
        self.before_query(referenced_table).await?;

        let tables = self.tables.read();
        let rows = tables.get(table).ok_or_else(|| missing_table(table))?;
        let referenced = tables
            .get(referenced_table)
            .ok_or_else(|| missing_table(referenced_table))?;

        let ids: HashSet<String> = referenced
            .iter()
            .filter_map(|row| row.get("id"))
            .map(Value::to_string)
            .collect();

        Ok(rows
            .iter()
            .filter(|row| match row.get(foreign_key) {
                None | Some(Value::Null) => false,
                Some(key) => !ids.contains(&key.to_string()),
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn call_procedure(&self, name: &str, args: Value) -> Result<Option<Value>> {
        let Some(procedure) = self.procedures.read().get(name).cloned() else {
            debug!(procedure = name, "Procedure not found");
            return Ok(None);
        };

        let tables = self.tables.read();
        procedure(&tables, &args).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert("lofts", json!({"id": "loft-1", "name": "Canal loft", "price": 120}));
        store.insert("lofts", json!({"id": "loft-2", "name": "Attic", "price": 90}));
        store.insert("reservations", json!({"id": 1, "loft_id": "loft-1"}));
        store.insert("reservations", json!({"id": 2, "loft_id": "loft-9"}));
        store.insert("reservations", json!({"id": 3, "loft_id": null}));
        store
    }

    #[tokio::test]
    async fn test_select_projects_and_limits() {
        let store = seeded();

        let rows = store.select("lofts", "id", 1).await.unwrap();
        assert_eq!(rows, vec![json!({"id": "loft-1"})]);

        let rows = store.select("lofts", "id, price", 10).await.unwrap();
        assert_eq!(rows[1], json!({"id": "loft-2", "price": 90}));

        let rows = store.select("lofts", "*", 10).await.unwrap();
        assert_eq!(rows[0]["name"], "Canal loft");
    }

    #[tokio::test]
    async fn test_unknown_table_is_an_error() {
        let store = seeded();
        let err = store.select("payments", "id", 1).await.unwrap_err();
        assert!(err.to_string().contains("relation \"payments\" does not exist"));
    }

    #[tokio::test]
    async fn test_find_orphans() {
        let store = seeded();

        let orphans = store
            .find_orphans("reservations", "loft_id", "lofts", 10)
            .await
            .unwrap();
        assert_eq!(orphans, vec![json!({"id": 2, "loft_id": "loft-9"})]);

        assert_eq!(store.delete("lofts", &json!("loft-1")), 1);
        let orphans = store
            .find_orphans("reservations", "loft_id", "lofts", 1)
            .await
            .unwrap();
        assert_eq!(orphans.len(), 1);
    }

    #[tokio::test]
    async fn test_procedures() {
        let store = seeded();
        assert_eq!(store.call_procedure("missing", json!({})).await.unwrap(), None);

        store.register_procedure(
            "count_lofts",
            Arc::new(|tables: &Tables, _args: &Value| {
                Ok(json!(tables.get("lofts").map(Vec::len).unwrap_or(0)))
            }),
        );
        assert_eq!(
            store.call_procedure("count_lofts", json!({})).await.unwrap(),
            Some(json!(2))
        );
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = seeded();
        store.fail_table("reservations", "connection reset");

        assert!(store.select("lofts", "id", 1).await.is_ok());
        let err = store.select("reservations", "id", 1).await.unwrap_err();
        assert!(matches!(err, MonitorError::Database(_)));

        store.clear_failures();
        assert!(store.select("reservations", "id", 1).await.is_ok());
    }
}
