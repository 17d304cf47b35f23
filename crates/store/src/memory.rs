//! In-memory table backend.
//!
//! Interprets the same query model as the HTTP backend over JSON rows held
//! in process memory. Server-side procedures are registrable closures that
//! receive mutable access to the table map. Used by tests and offline
//! development; it is not a persistence layer.

use crate::backend::TableBackend;
use crate::error::{StoreError, StoreResult};
use crate::query::{Direction, Filter, Query};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::RwLock;

type Tables = HashMap<String, Vec<Value>>;
type RpcHandler = Box<dyn Fn(&mut Tables, Value) -> StoreResult<Value> + Send + Sync>;

#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
    rpcs: RwLock<HashMap<String, RpcHandler>>,
    calls: AtomicU64,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a table with rows.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.write().expect("tables lock");
        tables.entry(table.to_owned()).or_default().extend(rows);
    }

    /// Registers a handler for a named server-side procedure.
    pub fn register_rpc(
        &self,
        function: &str,
        handler: impl Fn(&mut Tables, Value) -> StoreResult<Value> + Send + Sync + 'static,
    ) {
        let mut rpcs = self.rpcs.write().expect("rpcs lock");
        rpcs.insert(function.to_owned(), Box::new(handler));
    }

    /// When set, every backend operation fails with a synthetic remote
    /// error. Lets tests exercise failure paths.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, AtomicOrdering::SeqCst);
    }

    /// Number of backend operations issued so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Snapshot of a table's rows.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.read().expect("tables lock");
        tables.get(table).cloned().unwrap_or_default()
    }

    fn track_call(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                body: "memory backend set to fail".into(),
            });
        }
        Ok(())
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| match filter {
        Filter::Eq { column, value } => row.get(column) == Some(value),
        Filter::IlikeAny { columns, needle } => {
            let needle = needle.to_lowercase();
            columns.iter().any(|column| {
                row.get(column)
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        }
    })
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => {
            let x = a.as_str().map(str::to_owned).unwrap_or_else(|| a.to_string());
            let y = b.as_str().map(str::to_owned).unwrap_or_else(|| b.to_string());
            x.cmp(&y)
        }
    }
}

fn apply_order_and_limit(mut rows: Vec<Value>, query: &Query) -> Vec<Value> {
    if let Some((column, direction)) = &query.order {
        rows.sort_by(|a, b| {
            let null = Value::Null;
            let av = a.get(column).unwrap_or(&null);
            let bv = b.get(column).unwrap_or(&null);
            let ordering = compare_values(av, bv);
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
    }
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }
    rows
}

fn merge_into(target: &mut Value, patch: &Value) {
    if let (Some(target_map), Some(patch_map)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_map {
            target_map.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait::async_trait]
impl TableBackend for MemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> StoreResult<Vec<Value>> {
        self.track_call()?;
        let tables = self.tables.read().expect("tables lock");
        let rows = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, &query.filters))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(apply_order_and_limit(rows, query))
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        self.track_call()?;
        let mut tables = self.tables.write().expect("tables lock");
        tables
            .entry(table.to_owned())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> StoreResult<Vec<Value>> {
        self.track_call()?;
        let mut tables = self.tables.write().expect("tables lock");
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut() {
                if matches(row, &query.filters) {
                    merge_into(row, &patch);
                    updated.push(row.clone());
                }
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, query: &Query) -> StoreResult<u64> {
        self.track_call()?;
        let mut tables = self.tables.write().expect("tables lock");
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !matches(row, &query.filters));
        Ok((before - rows.len()) as u64)
    }

    async fn upsert(&self, table: &str, conflict_column: &str, row: Value) -> StoreResult<Value> {
        self.track_call()?;
        let mut tables = self.tables.write().expect("tables lock");
        let rows = tables.entry(table.to_owned()).or_default();
        let conflict_value = row.get(conflict_column).cloned().unwrap_or(Value::Null);
        if let Some(existing) = rows
            .iter_mut()
            .find(|candidate| candidate.get(conflict_column) == Some(&conflict_value))
        {
            merge_into(existing, &row);
            return Ok(existing.clone());
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn rpc(&self, function: &str, args: Value) -> StoreResult<Value> {
        self.track_call()?;
        let rpcs = self.rpcs.read().expect("rpcs lock");
        let handler = rpcs.get(function).ok_or_else(|| StoreError::Rpc {
            function: function.to_owned(),
            message: "no such procedure".into(),
        })?;
        let mut tables = self.tables.write().expect("tables lock");
        handler(&mut tables, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn select_filters_orders_and_limits() {
        let backend = MemoryBackend::new();
        backend.seed(
            "destinations",
            vec![
                json!({"id": "1", "name": "Phuket", "country": "Thailand"}),
                json!({"id": "2", "name": "Bangkok", "country": "Thailand"}),
                json!({"id": "3", "name": "Istanbul", "country": "Turkey"}),
            ],
        );

        let rows = backend
            .select(
                "destinations",
                &Query::new().eq("country", "Thailand").order_asc("name").limit(1),
            )
            .await
            .expect("select");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("Bangkok"));
    }

    #[tokio::test]
    async fn ilike_any_is_case_insensitive() {
        let backend = MemoryBackend::new();
        backend.seed(
            "treatments",
            vec![
                json!({"id": "1", "name": "Knee Replacement", "category": "Orthopedics"}),
                json!({"id": "2", "name": "Dental Implants", "category": "Dentistry"}),
            ],
        );

        let rows = backend
            .select(
                "treatments",
                &Query::new().ilike_any(&["name", "category"], "KNEE"),
            )
            .await
            .expect("select");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("1"));
    }

    #[tokio::test]
    async fn update_patches_only_matching_rows() {
        let backend = MemoryBackend::new();
        backend.seed(
            "journey_milestones",
            vec![
                json!({"id": "m-1", "completed": false}),
                json!({"id": "m-2", "completed": false}),
            ],
        );

        let updated = backend
            .update(
                "journey_milestones",
                &Query::new().eq("id", "m-1"),
                json!({"completed": true}),
            )
            .await
            .expect("update");

        assert_eq!(updated.len(), 1);
        let rows = backend.rows("journey_milestones");
        assert_eq!(rows[0]["completed"], json!(true));
        assert_eq!(rows[1]["completed"], json!(false));
    }

    #[tokio::test]
    async fn upsert_merges_on_conflict_column() {
        let backend = MemoryBackend::new();
        backend.seed(
            "patient_journeys",
            vec![json!({"user_id": "u-1", "journey_stage": "initial_inquiry"})],
        );

        let row = backend
            .upsert(
                "patient_journeys",
                "user_id",
                json!({"user_id": "u-1", "current_step": 1}),
            )
            .await
            .expect("upsert");

        assert_eq!(row["journey_stage"], json!("initial_inquiry"));
        assert_eq!(row["current_step"], json!(1));
        assert_eq!(backend.rows("patient_journeys").len(), 1);
    }

    #[tokio::test]
    async fn failing_mode_rejects_and_leaves_rows_untouched() {
        let backend = MemoryBackend::new();
        backend.seed("destinations", vec![json!({"id": "1"})]);
        backend.set_failing(true);

        let err = backend
            .delete("destinations", &Query::new().eq("id", "1"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, StoreError::Status { status: 503, .. }));

        backend.set_failing(false);
        assert_eq!(backend.rows("destinations").len(), 1);
    }
}
