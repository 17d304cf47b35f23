//! Request and response bodies specific to the REST surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use voyamed_core::{JourneyState, JourneyStage};
use voyamed_store::{Destination, JourneyMilestone, PatientJourney, Treatment};

/// Stage metadata as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StageRes {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub step: u32,
}

impl From<JourneyStage> for StageRes {
    fn from(stage: JourneyStage) -> Self {
        Self {
            id: stage.as_str().to_owned(),
            title: stage.title().to_owned(),
            summary: stage.summary().to_owned(),
            step: stage.step(),
        }
    }
}

/// A journey with its milestones and derived presentation values.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JourneyRes {
    pub journey: PatientJourney,
    pub milestones: Vec<JourneyMilestone>,
    pub progress_percentage: u8,
    pub current_stage: Option<StageRes>,
    pub next_stage: Option<StageRes>,
}

impl JourneyRes {
    pub fn from_state(state: &JourneyState) -> Self {
        // A stage value this client does not know is rendered without
        // metadata rather than rejected; the store stays authoritative.
        let current = state.current_stage().ok();
        Self {
            journey: state.journey.clone(),
            milestones: state.milestones.clone(),
            progress_percentage: state.progress_percentage(),
            current_stage: current.map(StageRes::from),
            next_stage: current.as_ref().and_then(JourneyStage::next).map(StageRes::from),
        }
    }
}

/// Body for `POST /journey/{user_id}/advance`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdvanceJourneyReq {
    pub new_stage: String,
}

/// Merged search hits with per-category counts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchRes {
    pub query: String,
    pub destinations: Vec<Destination>,
    pub treatments: Vec<Treatment>,
    pub destination_count: usize,
    pub treatment_count: usize,
}

impl From<voyamed_core::SearchResults> for SearchRes {
    fn from(results: voyamed_core::SearchResults) -> Self {
        Self {
            destination_count: results.destination_count(),
            treatment_count: results.treatment_count(),
            query: results.query,
            destinations: results.destinations,
            treatments: results.treatments,
        }
    }
}

/// Body for `POST /history/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateHistoryReq {
    pub condition: String,
    pub notes: Option<String>,
}

/// Body for `POST /tickets/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTicketReq {
    pub subject: String,
    pub message: String,
}
