//! PostgREST-style HTTP backend.
//!
//! Speaks the table API of the hosted store: `GET /rest/v1/{table}` with
//! `column=eq.value` and `or=(col.ilike.*needle*,...)` filters, writes
//! with `Prefer: return=representation`, upserts with
//! `resolution=merge-duplicates`, and procedures via
//! `POST /rest/v1/rpc/{function}`. Authentication is an `apikey` header
//! plus the same key as a bearer token.

use crate::backend::TableBackend;
use crate::error::{StoreError, StoreResult};
use crate::query::{Filter, Query};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend for the store at `base_url` authenticated with
    /// `api_key`. The trailing slash of `base_url` is tolerated.
    pub fn new(base_url: &str, api_key: &str) -> StoreResult<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(StoreError::InvalidConfig("store base URL is empty".into()));
        }

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|_| StoreError::InvalidConfig("API key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| StoreError::InvalidConfig("API key is not a valid header value".into()))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// Translates the query model into PostgREST query-string pairs.
    fn query_pairs(query: &Query) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for filter in &query.filters {
            match filter {
                Filter::Eq { column, value } => {
                    pairs.push((column.clone(), format!("eq.{}", render_value(value))));
                }
                Filter::IlikeAny { columns, needle } => {
                    let group = columns
                        .iter()
                        .map(|column| format!("{column}.ilike.*{needle}*"))
                        .collect::<Vec<_>>()
                        .join(",");
                    pairs.push(("or".to_owned(), format!("({group})")));
                }
            }
        }

        if let Some((column, direction)) = &query.order {
            pairs.push(("order".to_owned(), format!("{column}.{}", direction.as_str())));
        }

        if let Some(limit) = query.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }

        pairs
    }

    async fn read_rows(response: reqwest::Response) -> StoreResult<Vec<Value>> {
        let response = check_status(response).await?;
        let rows = response.json::<Vec<Value>>().await?;
        Ok(rows)
    }
}

/// PostgREST takes scalar operands unquoted, so strings are passed through
/// and everything else uses its JSON rendering.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait::async_trait]
impl TableBackend for HttpBackend {
    async fn select(&self, table: &str, query: &Query) -> StoreResult<Vec<Value>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&Self::query_pairs(query))
            .send()
            .await?;
        Self::read_rows(response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&rows)
            .send()
            .await?;
        Self::read_rows(response).await
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> StoreResult<Vec<Value>> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&Self::query_pairs(query))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;
        Self::read_rows(response).await
    }

    async fn delete(&self, table: &str, query: &Query) -> StoreResult<u64> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&Self::query_pairs(query))
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;
        let rows = Self::read_rows(response).await?;
        Ok(rows.len() as u64)
    }

    async fn upsert(&self, table: &str, conflict_column: &str, row: Value) -> StoreResult<Value> {
        let response = self
            .client
            .post(self.table_url(table))
            .query(&[("on_conflict", conflict_column)])
            .header("Prefer", PREFER_UPSERT)
            .json(&vec![row])
            .send()
            .await?;
        let mut rows = Self::read_rows(response).await?;
        rows.pop().ok_or_else(|| StoreError::Status {
            status: 200,
            body: format!("upsert into {table} returned no representation"),
        })
    }

    async fn rpc(&self, function: &str, args: Value) -> StoreResult<Value> {
        let response = self
            .client
            .post(self.rpc_url(function))
            .json(&args)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let value = serde_json::from_str(&body)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(&server.base_url(), "test-key").expect("backend")
    }

    #[tokio::test]
    async fn select_encodes_filters_order_and_limit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/destinations")
                    .header("apikey", "test-key")
                    .header("authorization", "Bearer test-key")
                    .query_param("country", "eq.Thailand")
                    .query_param("or", "(name.ilike.*knee*,city.ilike.*knee*)")
                    .query_param("order", "name.asc")
                    .query_param("limit", "10");
                then.status(200).json_body(json!([{"id": "d-1"}]));
            })
            .await;

        let query = Query::new()
            .eq("country", "Thailand")
            .ilike_any(&["name", "city"], "knee")
            .order_asc("name")
            .limit(10);
        let rows = backend(&server)
            .select("destinations", &query)
            .await
            .expect("select");

        mock.assert_async().await;
        assert_eq!(rows, vec![json!({"id": "d-1"})]);
    }

    #[tokio::test]
    async fn insert_requests_representation() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/bookings")
                    .header("prefer", "return=representation")
                    .json_body(json!([{"id": "b-1"}]));
                then.status(201).json_body(json!([{"id": "b-1"}]));
            })
            .await;

        let rows = backend(&server)
            .insert("bookings", vec![json!({"id": "b-1"})])
            .await
            .expect("insert");

        mock.assert_async().await;
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn upsert_sets_conflict_column_and_merge_preference() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/patient_journeys")
                    .query_param("on_conflict", "user_id")
                    .header("prefer", "resolution=merge-duplicates,return=representation");
                then.status(201).json_body(json!([{"user_id": "u-1"}]));
            })
            .await;

        let row = backend(&server)
            .upsert("patient_journeys", "user_id", json!({"user_id": "u-1"}))
            .await
            .expect("upsert");

        mock.assert_async().await;
        assert_eq!(row["user_id"], json!("u-1"));
    }

    #[tokio::test]
    async fn rpc_posts_arguments_and_tolerates_empty_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/rpc/advance_patient_journey")
                    .json_body(json!({"user_id": "u-1", "new_stage": "records_review"}));
                then.status(204);
            })
            .await;

        let value = backend(&server)
            .rpc(
                "advance_patient_journey",
                json!({"user_id": "u-1", "new_stage": "records_review"}),
            )
            .await
            .expect("rpc");

        mock.assert_async().await;
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn non_success_status_surfaces_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/treatments");
                then.status(500).body("storage exploded");
            })
            .await;

        let err = backend(&server)
            .select("treatments", &Query::new())
            .await
            .expect_err("should fail");

        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "storage exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
