use super::{decode_one, decode_rows};
use crate::backend::TableBackend;
use crate::error::StoreResult;
use crate::models::{
    MedicalHistoryEntry, NewMedicalHistoryEntry, NewSupportTicket, SupportTicket, TicketStatus,
};
use crate::query::Query;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

const HISTORY: &str = "medical_history";
const TICKETS: &str = "support_tickets";

/// Data access for a user's medical-history entries.
#[derive(Clone)]
pub struct MedicalHistoryRepo {
    backend: Arc<dyn TableBackend>,
}

impl MedicalHistoryRepo {
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    /// A user's history, most recent first.
    pub async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<MedicalHistoryEntry>> {
        let rows = self
            .backend
            .select(
                HISTORY,
                &Query::new().eq("user_id", user_id).order_desc("recorded_at"),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, user_id, "listing medical history failed");
            })?;
        decode_rows(rows)
    }

    pub async fn create(&self, new: NewMedicalHistoryEntry) -> StoreResult<MedicalHistoryEntry> {
        let entry = MedicalHistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new.user_id,
            condition: new.condition,
            notes: new.notes,
            recorded_at: Utc::now(),
        };
        let rows = self
            .backend
            .insert(HISTORY, vec![serde_json::to_value(&entry)?])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "recording medical history failed"))?;
        decode_one(rows, HISTORY, &entry.id)
    }
}

/// Data access for support tickets.
#[derive(Clone)]
pub struct SupportTicketsRepo {
    backend: Arc<dyn TableBackend>,
}

impl SupportTicketsRepo {
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    /// A user's tickets, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<SupportTicket>> {
        let rows = self
            .backend
            .select(
                TICKETS,
                &Query::new().eq("user_id", user_id).order_desc("created_at"),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, user_id, "listing tickets failed"))?;
        decode_rows(rows)
    }

    pub async fn create(&self, new: NewSupportTicket) -> StoreResult<SupportTicket> {
        let ticket = SupportTicket {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new.user_id,
            subject: new.subject,
            message: new.message,
            status: TicketStatus::Open,
            created_at: Utc::now(),
        };
        let rows = self
            .backend
            .insert(TICKETS, vec![serde_json::to_value(&ticket)?])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "opening ticket failed"))?;
        decode_one(rows, TICKETS, &ticket.id)
    }

    pub async fn close(&self, id: &str) -> StoreResult<SupportTicket> {
        let rows = self
            .backend
            .update(
                TICKETS,
                &Query::new().eq("id", id),
                json!({ "status": "closed" }),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, id, "closing ticket failed"))?;
        decode_one(rows, TICKETS, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    #[tokio::test]
    async fn tickets_open_then_close() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = SupportTicketsRepo::new(backend.clone());

        let ticket = repo
            .create(NewSupportTicket {
                user_id: "u-1".into(),
                subject: "Visa letter".into(),
                message: "Need an invitation letter for my trip.".into(),
            })
            .await
            .expect("create");
        assert_eq!(ticket.status, TicketStatus::Open);

        let closed = repo.close(&ticket.id).await.expect("close");
        assert_eq!(closed.status, TicketStatus::Closed);
    }

    #[tokio::test]
    async fn history_lists_only_the_requested_user() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = MedicalHistoryRepo::new(backend);

        repo.create(NewMedicalHistoryEntry {
            user_id: "u-1".into(),
            condition: "Hypertension".into(),
            notes: None,
        })
        .await
        .expect("create");
        repo.create(NewMedicalHistoryEntry {
            user_id: "u-2".into(),
            condition: "Asthma".into(),
            notes: None,
        })
        .await
        .expect("create");

        let entries = repo.list_for_user("u-1").await.expect("list");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].condition, "Hypertension");
    }
}
