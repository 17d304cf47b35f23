//! Application state shared across REST API handlers.

use std::sync::Arc;
use voyamed_core::{JourneyService, SearchService};
use voyamed_store::{
    BookingsRepo, DestinationsRepo, JourneysRepo, MedicalHistoryRepo, SupportTicketsRepo,
    TableBackend, TreatmentsRepo,
};

/// Repositories and services the handlers need, plus the admin key for
/// catalog mutations. Cloning is cheap; everything shares one backend.
#[derive(Clone)]
pub struct AppState {
    pub destinations: DestinationsRepo,
    pub treatments: TreatmentsRepo,
    pub bookings: BookingsRepo,
    pub journeys: JourneyService,
    pub search: SearchService,
    pub history: MedicalHistoryRepo,
    pub tickets: SupportTicketsRepo,
    pub admin_api_key: String,
}

impl AppState {
    /// Wires every repository and service to one table backend.
    pub fn new(backend: Arc<dyn TableBackend>, admin_api_key: String) -> Self {
        let destinations = DestinationsRepo::new(backend.clone());
        let treatments = TreatmentsRepo::new(backend.clone());
        Self {
            search: SearchService::new(destinations.clone(), treatments.clone()),
            journeys: JourneyService::new(JourneysRepo::new(backend.clone())),
            bookings: BookingsRepo::new(backend.clone()),
            history: MedicalHistoryRepo::new(backend.clone()),
            tickets: SupportTicketsRepo::new(backend),
            destinations,
            treatments,
            admin_api_key,
        }
    }
}
