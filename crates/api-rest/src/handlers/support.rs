//! Medical-history and support-ticket endpoints.

use crate::dto::{CreateHistoryReq, CreateTicketReq};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use voyamed_store::{
    MedicalHistoryEntry, NewMedicalHistoryEntry, NewSupportTicket, SupportTicket,
};
use voyamed_types::NonEmptyText;

#[utoipa::path(
    get,
    path = "/history/{user_id}",
    responses(
        (status = 200, description = "The user's medical history, newest first", body = [MedicalHistoryEntry])
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<MedicalHistoryEntry>>, ApiError> {
    Ok(Json(state.history.list_for_user(&user_id).await?))
}

#[utoipa::path(
    post,
    path = "/history/{user_id}",
    request_body = CreateHistoryReq,
    responses(
        (status = 201, description = "History entry recorded", body = MedicalHistoryEntry),
        (status = 400, description = "Empty condition")
    )
)]
pub async fn create_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateHistoryReq>,
) -> Result<(StatusCode, Json<MedicalHistoryEntry>), ApiError> {
    let condition = NonEmptyText::new(&req.condition)
        .map_err(|e| ApiError::bad_request(format!("condition: {e}")))?;
    let entry = state
        .history
        .create(NewMedicalHistoryEntry {
            user_id,
            condition: condition.as_str().to_owned(),
            notes: req.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/tickets/{user_id}",
    responses(
        (status = 200, description = "The user's support tickets, newest first", body = [SupportTicket])
    )
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SupportTicket>>, ApiError> {
    Ok(Json(state.tickets.list_for_user(&user_id).await?))
}

#[utoipa::path(
    post,
    path = "/tickets/{user_id}",
    request_body = CreateTicketReq,
    responses(
        (status = 201, description = "Ticket opened", body = SupportTicket),
        (status = 400, description = "Empty subject or message")
    )
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateTicketReq>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    let subject = NonEmptyText::new(&req.subject)
        .map_err(|e| ApiError::bad_request(format!("subject: {e}")))?;
    let message = NonEmptyText::new(&req.message)
        .map_err(|e| ApiError::bad_request(format!("message: {e}")))?;
    let ticket = state
        .tickets
        .create(NewSupportTicket {
            user_id,
            subject: subject.as_str().to_owned(),
            message: message.as_str().to_owned(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

#[utoipa::path(
    post,
    path = "/tickets/{id}/close",
    responses(
        (status = 200, description = "Ticket closed", body = SupportTicket),
        (status = 404, description = "No such ticket")
    )
)]
pub async fn close_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SupportTicket>, ApiError> {
    Ok(Json(state.tickets.close(&id).await?))
}
