//! Per-entity repositories.
//!
//! Each repository wraps the table backend with typed operations for one
//! collection: list (fixed sort column), get-by-id (not-found is an
//! error), free-text search, create, update, delete. No caching, no
//! retry, no pagination. Remote errors are logged and propagated with `?`.

mod bookings;
mod destinations;
mod journeys;
mod support;
mod treatments;

pub use bookings::BookingsRepo;
pub use destinations::DestinationsRepo;
pub use journeys::JourneysRepo;
pub use support::{MedicalHistoryRepo, SupportTicketsRepo};
pub use treatments::TreatmentsRepo;

use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(|row| Ok(serde_json::from_value(row)?))
        .collect()
}

/// Decodes the single row of a get-by-id style response, mapping an empty
/// response to `NotFound`.
pub(crate) fn decode_one<T: DeserializeOwned>(
    mut rows: Vec<Value>,
    table: &str,
    id: &str,
) -> StoreResult<T> {
    let row = rows.pop().ok_or_else(|| StoreError::NotFound {
        table: table.to_owned(),
        id: id.to_owned(),
    })?;
    Ok(serde_json::from_value(row)?)
}
