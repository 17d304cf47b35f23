use super::decode_one;
use crate::backend::TableBackend;
use crate::error::StoreResult;
use crate::models::{Booking, NewBooking};
use chrono::Utc;
use std::sync::Arc;

const TABLE: &str = "bookings";

/// Data access for bookings. Write-only by design: there is no read,
/// update, or cancellation flow.
#[derive(Clone)]
pub struct BookingsRepo {
    backend: Arc<dyn TableBackend>,
}

impl BookingsRepo {
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self { backend }
    }

    pub async fn create(&self, new: NewBooking) -> StoreResult<Booking> {
        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new.user_id,
            destination_id: new.destination_id,
            treatment_id: new.treatment_id,
            booking_date: new.booking_date,
            notes: new.notes,
            created_at: Utc::now(),
        };
        let rows = self
            .backend
            .insert(TABLE, vec![serde_json::to_value(&booking)?])
            .await
            .inspect_err(|e| tracing::error!(error = %e, "creating booking failed"))?;
        decode_one(rows, TABLE, &booking.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn create_persists_a_booking_row() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = BookingsRepo::new(backend.clone());

        let booking = repo
            .create(NewBooking {
                user_id: "u-1".into(),
                destination_id: "d-1".into(),
                treatment_id: "t-1".into(),
                booking_date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("date"),
                notes: Some("window seat".into()),
            })
            .await
            .expect("create");

        assert_eq!(booking.user_id, "u-1");
        assert_eq!(backend.rows(TABLE).len(), 1);
    }

    #[tokio::test]
    async fn failed_create_propagates_the_remote_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_failing(true);
        let repo = BookingsRepo::new(backend.clone());

        let result = repo
            .create(NewBooking {
                user_id: "u-1".into(),
                destination_id: "d-1".into(),
                treatment_id: "t-1".into(),
                booking_date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("date"),
                notes: None,
            })
            .await;

        assert!(result.is_err());
        backend.set_failing(false);
        assert!(backend.rows(TABLE).is_empty());
    }
}
