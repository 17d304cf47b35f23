//! Free-text search endpoint.

use crate::dto::SearchRes;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/search",
    params(("q" = String, Query, description = "Free-text query, minimum 2 characters")),
    responses(
        (status = 200, description = "Merged destination and treatment hits", body = SearchRes),
        (status = 502, description = "Remote store error")
    )
)]
/// Searches both catalogs. Queries shorter than 2 characters return empty
/// result sets without touching the remote store.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchRes>, ApiError> {
    let results = state.search.search(&params.q).await?;
    Ok(Json(results.into()))
}
