use super::{decode_one, decode_rows};
use crate::backend::TableBackend;
use crate::error::StoreResult;
use crate::models::{JourneyMilestone, PatientJourney};
use crate::query::Query;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

const JOURNEYS: &str = "patient_journeys";
const MILESTONES: &str = "journey_milestones";

/// Name of the server-side stage-advance procedure. The transition rule it
/// applies lives in the remote store, not here.
pub const ADVANCE_PROCEDURE: &str = "advance_patient_journey";

/// Data access for patient journeys and their milestones.
#[derive(Clone)]
pub struct JourneysRepo {
    backend: Arc<dyn TableBackend>,
}

impl JourneysRepo {
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    /// Fetches the journey row for a user, if one exists.
    pub async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<PatientJourney>> {
        let mut rows = self
            .backend
            .select(JOURNEYS, &Query::new().eq("user_id", user_id).limit(1))
            .await
            .inspect_err(|e| tracing::error!(error = %e, user_id, "fetching journey failed"))?;
        let Some(row) = rows.pop() else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(row)?))
    }

    /// Writes an initial journey row, merging on `user_id` so a concurrent
    /// first access cannot create a duplicate.
    pub async fn create_initial(&self, journey: &PatientJourney) -> StoreResult<PatientJourney> {
        let row = self
            .backend
            .upsert(JOURNEYS, "user_id", serde_json::to_value(journey)?)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, user_id = %journey.user_id, "creating journey failed");
            })?;
        Ok(serde_json::from_value(row)?)
    }

    /// All milestones belonging to a journey, earliest due first.
    pub async fn milestones(&self, journey_id: &str) -> StoreResult<Vec<JourneyMilestone>> {
        let rows = self
            .backend
            .select(
                MILESTONES,
                &Query::new().eq("journey_id", journey_id).order_asc("due_date"),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, journey_id, "fetching milestones failed");
            })?;
        decode_rows(rows)
    }

    pub async fn insert_milestones(
        &self,
        milestones: &[JourneyMilestone],
    ) -> StoreResult<Vec<JourneyMilestone>> {
        let rows = milestones
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = self
            .backend
            .insert(MILESTONES, rows)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "seeding milestones failed"))?;
        decode_rows(inserted)
    }

    /// Marks one milestone completed with the given timestamp and returns
    /// the updated row.
    pub async fn complete_milestone(
        &self,
        id: &str,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<JourneyMilestone> {
        let rows = self
            .backend
            .update(
                MILESTONES,
                &Query::new().eq("id", id),
                json!({ "completed": true, "completed_at": completed_at }),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "completing milestone failed"))?;
        decode_one(rows, MILESTONES, id)
    }

    /// Invokes the server-side stage-advance procedure. The server is the
    /// authority on whether the transition is accepted.
    pub async fn advance(&self, user_id: &str, new_stage: &str) -> StoreResult<()> {
        self.backend
            .rpc(
                ADVANCE_PROCEDURE,
                json!({ "user_id": user_id, "new_stage": new_stage }),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, user_id, new_stage, "stage advance failed");
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::memory::MemoryBackend;

    fn journey_row() -> serde_json::Value {
        json!({
            "id": "j-1", "user_id": "u-1", "journey_stage": "initial_inquiry",
            "current_step": 1, "total_steps": 16,
            "created_at": "2026-01-05T09:00:00Z", "updated_at": "2026-01-05T09:00:00Z"
        })
    }

    #[tokio::test]
    async fn find_by_user_returns_none_for_new_user() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = JourneysRepo::new(backend);
        assert!(repo.find_by_user("u-9").await.expect("find").is_none());
    }

    #[tokio::test]
    async fn create_initial_is_idempotent_per_user() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = JourneysRepo::new(backend.clone());
        let journey: PatientJourney =
            serde_json::from_value(journey_row()).expect("journey");

        repo.create_initial(&journey).await.expect("first create");
        repo.create_initial(&journey).await.expect("second create");

        assert_eq!(backend.rows(JOURNEYS).len(), 1);
    }

    #[tokio::test]
    async fn complete_milestone_sets_flag_and_timestamp() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            MILESTONES,
            vec![json!({
                "id": "m-1", "journey_id": "j-1", "milestone_type": "profile",
                "title": "Complete your health profile", "description": null,
                "completed": false, "due_date": null, "completed_at": null
            })],
        );
        let repo = JourneysRepo::new(backend);

        let when = Utc::now();
        let milestone = repo.complete_milestone("m-1", when).await.expect("complete");
        assert!(milestone.completed);
        assert_eq!(milestone.completed_at, Some(when));
    }

    #[tokio::test]
    async fn advance_invokes_the_remote_procedure() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(JOURNEYS, vec![journey_row()]);
        backend.register_rpc(ADVANCE_PROCEDURE, |tables, args| {
            let user_id = args["user_id"].clone();
            let rows = tables.get_mut(JOURNEYS).expect("journeys table");
            let row = rows
                .iter_mut()
                .find(|row| row["user_id"] == user_id)
                .ok_or_else(|| StoreError::Rpc {
                    function: ADVANCE_PROCEDURE.into(),
                    message: "no journey for user".into(),
                })?;
            row["journey_stage"] = args["new_stage"].clone();
            row["current_step"] = json!(row["current_step"].as_u64().unwrap_or(0) + 1);
            Ok(serde_json::Value::Null)
        });
        let repo = JourneysRepo::new(backend.clone());

        repo.advance("u-1", "records_review").await.expect("advance");

        let rows = backend.rows(JOURNEYS);
        assert_eq!(rows[0]["journey_stage"], json!("records_review"));
        assert_eq!(rows[0]["current_step"], json!(2));
    }
}
