use super::{decode_one, decode_rows};
use crate::backend::TableBackend;
use crate::error::{StoreError, StoreResult};
use crate::models::{Destination, NewDestination};
use crate::query::Query;
use std::sync::Arc;
use voyamed_types::SearchQuery;

const TABLE: &str = "destinations";

/// Data access for the destination catalog. Listing is sorted by name.
#[derive(Clone)]
pub struct DestinationsRepo {
    backend: Arc<dyn TableBackend>,
}

impl DestinationsRepo {
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> StoreResult<Vec<Destination>> {
        let rows = self
            .backend
            .select(TABLE, &Query::new().order_asc("name"))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "listing destinations failed"))?;
        decode_rows(rows)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Destination> {
        let rows = self
            .backend
            .select(TABLE, &Query::new().eq("id", id).limit(1))
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "fetching destination failed"))?;
        decode_one(rows, TABLE, id)
    }

    /// Case-insensitive OR match across name, city, and country.
    pub async fn search(&self, query: &SearchQuery) -> StoreResult<Vec<Destination>> {
        let rows = self
            .backend
            .select(
                TABLE,
                &Query::new()
                    .ilike_any(&["name", "city", "country"], query.as_str())
                    .order_asc("name"),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "searching destinations failed"))?;
        decode_rows(rows)
    }

    pub async fn create(&self, new: NewDestination) -> StoreResult<Destination> {
        let destination = Destination {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            city: new.city,
            country: new.country,
            rating: new.rating,
            image_url: new.image_url,
            savings_percentage: new.savings_percentage,
            description: new.description,
        };
        let rows = self
            .backend
            .insert(TABLE, vec![serde_json::to_value(&destination)?])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "creating destination failed"))?;
        decode_one(rows, TABLE, &destination.id)
    }

    pub async fn update(&self, id: &str, new: NewDestination) -> StoreResult<Destination> {
        let rows = self
            .backend
            .update(TABLE, &Query::new().eq("id", id), serde_json::to_value(&new)?)
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "updating destination failed"))?;
        decode_one(rows, TABLE, id)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self
            .backend
            .delete(TABLE, &Query::new().eq("id", id))
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "deleting destination failed"))?;
        if removed == 0 {
            return Err(StoreError::NotFound {
                table: TABLE.to_owned(),
                id: id.to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use serde_json::json;

    fn seeded() -> (Arc<MemoryBackend>, DestinationsRepo) {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            TABLE,
            vec![
                json!({
                    "id": "d-2", "name": "Phuket", "city": "Phuket", "country": "Thailand",
                    "rating": 4.6, "image_url": null, "savings_percentage": 60,
                    "description": null
                }),
                json!({
                    "id": "d-1", "name": "Bangkok", "city": "Bangkok", "country": "Thailand",
                    "rating": 4.8, "image_url": null, "savings_percentage": 65,
                    "description": "Regional hub"
                }),
            ],
        );
        let repo = DestinationsRepo::new(backend.clone());
        (backend, repo)
    }

    #[tokio::test]
    async fn list_sorts_by_name() {
        let (_backend, repo) = seeded();
        let destinations = repo.list().await.expect("list");
        let names: Vec<_> = destinations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Bangkok", "Phuket"]);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_backend, repo) = seeded();
        let err = repo.get("nope").await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn failed_delete_leaves_rows_unchanged() {
        let (backend, repo) = seeded();
        backend.set_failing(true);
        assert!(repo.delete("d-1").await.is_err());
        backend.set_failing(false);
        assert_eq!(backend.rows(TABLE).len(), 2);
    }

    #[tokio::test]
    async fn search_matches_city_case_insensitively() {
        let (_backend, repo) = seeded();
        let query = SearchQuery::new("bang").expect("query");
        let hits = repo.search(&query).await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d-1");
    }
}
