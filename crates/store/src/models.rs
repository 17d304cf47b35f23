//! Row types for the remote collections.
//!
//! These mirror the hosted tables one to one. The client deliberately does
//! not re-validate what the remote store enforces; `journey_stage` stays a
//! plain string here and is interpreted by the domain layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A medical-tourism destination offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub rating: f64,
    pub image_url: Option<String>,
    pub savings_percentage: Option<i64>,
    pub description: Option<String>,
}

/// Fields for creating or replacing a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewDestination {
    pub name: String,
    pub city: String,
    pub country: String,
    pub rating: f64,
    pub image_url: Option<String>,
    pub savings_percentage: Option<i64>,
    pub description: Option<String>,
}

/// A treatment category offered across destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Treatment {
    pub id: String,
    pub name: String,
    pub category: String,
    pub procedure_count: i64,
    pub icon_name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

/// Fields for creating or replacing a treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewTreatment {
    pub name: String,
    pub category: String,
    pub procedure_count: i64,
    pub icon_name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

/// A booking request. Bookings are write-only: there is no read, update,
/// or cancellation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub destination_id: String,
    pub treatment_id: String,
    pub booking_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewBooking {
    pub user_id: String,
    pub destination_id: String,
    pub treatment_id: String,
    pub booking_date: NaiveDate,
    pub notes: Option<String>,
}

/// One journey row per user. `journey_stage` is the remote value as
/// stored; stage semantics live in the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientJourney {
    pub id: String,
    pub user_id: String,
    pub journey_stage: String,
    pub current_step: u32,
    pub total_steps: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user-facing task tied to a journey, independently completable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JourneyMilestone {
    pub id: String,
    pub journey_id: String,
    pub milestone_type: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A medical-history entry recorded against a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub condition: String,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Fields for recording a medical-history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewMedicalHistoryEntry {
    pub user_id: String,
    pub condition: String,
    pub notes: Option<String>,
}

/// Lifecycle state of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Closed,
}

/// A support request raised by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupportTicket {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for opening a support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewSupportTicket {
    pub user_id: String,
    pub subject: String,
    pub message: String,
}
