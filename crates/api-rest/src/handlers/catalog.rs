//! Catalog and booking endpoints.
//!
//! Reads are open; catalog mutations are admin-only via `x-api-key`.

use super::require_admin;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use voyamed_store::{
    Booking, Destination, NewBooking, NewDestination, NewTreatment, Treatment,
};

#[utoipa::path(
    get,
    path = "/destinations",
    responses(
        (status = 200, description = "All destinations sorted by name", body = [Destination]),
        (status = 502, description = "Remote store error")
    )
)]
pub async fn list_destinations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Destination>>, ApiError> {
    Ok(Json(state.destinations.list().await?))
}

#[utoipa::path(
    get,
    path = "/destinations/{id}",
    responses(
        (status = 200, description = "Destination found", body = Destination),
        (status = 404, description = "No such destination")
    )
)]
pub async fn get_destination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Destination>, ApiError> {
    Ok(Json(state.destinations.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/destinations",
    request_body = NewDestination,
    responses(
        (status = 201, description = "Destination created", body = Destination),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn create_destination(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewDestination>,
) -> Result<(StatusCode, Json<Destination>), ApiError> {
    require_admin(&state, &headers)?;
    let destination = state.destinations.create(req).await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

#[utoipa::path(
    put,
    path = "/destinations/{id}",
    request_body = NewDestination,
    responses(
        (status = 200, description = "Destination updated", body = Destination),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "No such destination")
    )
)]
pub async fn update_destination(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<NewDestination>,
) -> Result<Json<Destination>, ApiError> {
    require_admin(&state, &headers)?;
    Ok(Json(state.destinations.update(&id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/destinations/{id}",
    responses(
        (status = 204, description = "Destination deleted"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "No such destination")
    )
)]
pub async fn delete_destination(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers)?;
    state.destinations.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/treatments",
    responses(
        (status = 200, description = "All treatments sorted by name", body = [Treatment]),
        (status = 502, description = "Remote store error")
    )
)]
pub async fn list_treatments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Treatment>>, ApiError> {
    Ok(Json(state.treatments.list().await?))
}

#[utoipa::path(
    get,
    path = "/treatments/{id}",
    responses(
        (status = 200, description = "Treatment found", body = Treatment),
        (status = 404, description = "No such treatment")
    )
)]
pub async fn get_treatment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Treatment>, ApiError> {
    Ok(Json(state.treatments.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/treatments",
    request_body = NewTreatment,
    responses(
        (status = 201, description = "Treatment created", body = Treatment),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn create_treatment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewTreatment>,
) -> Result<(StatusCode, Json<Treatment>), ApiError> {
    require_admin(&state, &headers)?;
    let treatment = state.treatments.create(req).await?;
    Ok((StatusCode::CREATED, Json(treatment)))
}

#[utoipa::path(
    put,
    path = "/treatments/{id}",
    request_body = NewTreatment,
    responses(
        (status = 200, description = "Treatment updated", body = Treatment),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "No such treatment")
    )
)]
pub async fn update_treatment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<NewTreatment>,
) -> Result<Json<Treatment>, ApiError> {
    require_admin(&state, &headers)?;
    Ok(Json(state.treatments.update(&id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/treatments/{id}",
    responses(
        (status = 204, description = "Treatment deleted"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "No such treatment")
    )
)]
pub async fn delete_treatment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers)?;
    state.treatments.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/bookings",
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 502, description = "Remote store error")
    )
)]
/// Creates a booking. Bookings are write-only: there is no endpoint to
/// read, change, or cancel one.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = state.bookings.create(req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}
