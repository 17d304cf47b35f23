use super::{decode_one, decode_rows};
use crate::backend::TableBackend;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewTreatment, Treatment};
use crate::query::Query;
use std::sync::Arc;
use voyamed_types::SearchQuery;

const TABLE: &str = "treatments";

/// Data access for the treatment catalog. Listing is sorted by name.
#[derive(Clone)]
pub struct TreatmentsRepo {
    backend: Arc<dyn TableBackend>,
}

impl TreatmentsRepo {
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> StoreResult<Vec<Treatment>> {
        let rows = self
            .backend
            .select(TABLE, &Query::new().order_asc("name"))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "listing treatments failed"))?;
        decode_rows(rows)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Treatment> {
        let rows = self
            .backend
            .select(TABLE, &Query::new().eq("id", id).limit(1))
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "fetching treatment failed"))?;
        decode_one(rows, TABLE, id)
    }

    /// Case-insensitive OR match across name and category.
    pub async fn search(&self, query: &SearchQuery) -> StoreResult<Vec<Treatment>> {
        let rows = self
            .backend
            .select(
                TABLE,
                &Query::new()
                    .ilike_any(&["name", "category"], query.as_str())
                    .order_asc("name"),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "searching treatments failed"))?;
        decode_rows(rows)
    }

    pub async fn create(&self, new: NewTreatment) -> StoreResult<Treatment> {
        let treatment = Treatment {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            category: new.category,
            procedure_count: new.procedure_count,
            icon_name: new.icon_name,
            color: new.color,
            description: new.description,
        };
        let rows = self
            .backend
            .insert(TABLE, vec![serde_json::to_value(&treatment)?])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "creating treatment failed"))?;
        decode_one(rows, TABLE, &treatment.id)
    }

    pub async fn update(&self, id: &str, new: NewTreatment) -> StoreResult<Treatment> {
        let rows = self
            .backend
            .update(TABLE, &Query::new().eq("id", id), serde_json::to_value(&new)?)
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "updating treatment failed"))?;
        decode_one(rows, TABLE, id)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self
            .backend
            .delete(TABLE, &Query::new().eq("id", id))
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "deleting treatment failed"))?;
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

    #[tokio::test]
    async fn search_matches_category() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            TABLE,
            vec![
                json!({
                    "id": "t-1", "name": "Knee Replacement", "category": "Orthopedics",
                    "procedure_count": 12, "icon_name": null, "color": null, "description": null
                }),
                json!({
                    "id": "t-2", "name": "Veneers", "category": "Dentistry",
                    "procedure_count": 8, "icon_name": null, "color": null, "description": null
                }),
            ],
        );
        let repo = TreatmentsRepo::new(backend);

        let query = SearchQuery::new("dent").expect("query");
        let hits = repo.search(&query).await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "t-2");
    }

    #[tokio::test]
    async fn create_allocates_an_id() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = TreatmentsRepo::new(backend.clone());

        let created = repo
            .create(NewTreatment {
                name: "Hip Resurfacing".into(),
                category: "Orthopedics".into(),
                procedure_count: 4,
                icon_name: None,
                color: None,
                description: None,
            })
            .await
            .expect("create");

        assert!(!created.id.is_empty());
        assert_eq!(backend.rows(TABLE).len(), 1);
    }
}
