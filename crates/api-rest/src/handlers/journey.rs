//! Journey and milestone endpoints.

use crate::dto::{AdvanceJourneyReq, JourneyRes};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Json;
use voyamed_core::JourneyStage;
use voyamed_store::JourneyMilestone;

#[utoipa::path(
    get,
    path = "/journey/{user_id}",
    responses(
        (status = 200, description = "The user's journey, created on first access", body = JourneyRes),
        (status = 502, description = "Remote store error")
    )
)]
/// Fetches a user's journey and milestones. A user with no journey row
/// gets one created at `initial_inquiry` with the three seed milestones.
pub async fn get_journey(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<JourneyRes>, ApiError> {
    let journey_state = state.journeys.load_or_create(&user_id).await?;
    Ok(Json(JourneyRes::from_state(&journey_state)))
}

#[utoipa::path(
    post,
    path = "/journey/{user_id}/advance",
    request_body = AdvanceJourneyReq,
    responses(
        (status = 200, description = "Journey advanced and resynchronised", body = JourneyRes),
        (status = 400, description = "Unknown stage identifier"),
        (status = 422, description = "Target is not the legal successor")
    )
)]
/// Advances the journey to the requested stage via the server-side
/// procedure, then returns the refetched state.
pub async fn advance_journey(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<AdvanceJourneyReq>,
) -> Result<Json<JourneyRes>, ApiError> {
    let target: JourneyStage = req
        .new_stage
        .parse()
        .map_err(|_| ApiError::bad_request(format!("unknown journey stage: {}", req.new_stage)))?;

    let current = state.journeys.load_or_create(&user_id).await?;
    let advanced = state.journeys.advance(&current, target).await?;
    Ok(Json(JourneyRes::from_state(&advanced)))
}

#[utoipa::path(
    post,
    path = "/milestones/{id}/complete",
    responses(
        (status = 200, description = "Milestone completed", body = JourneyMilestone),
        (status = 404, description = "No such milestone")
    )
)]
pub async fn complete_milestone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JourneyMilestone>, ApiError> {
    let milestone = state.journeys.complete_milestone(&id).await?;
    Ok(Json(milestone))
}
