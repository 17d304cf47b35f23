//! # API REST
//!
//! REST API implementation for Voyamed.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status mapping)
//!
//! Uses `api-shared` for health and admin-key checks and `voyamed-core`
//! for all domain logic.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorRes};
pub use state::AppState;

use api_shared::HealthRes;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::catalog::list_destinations,
        handlers::catalog::get_destination,
        handlers::catalog::create_destination,
        handlers::catalog::update_destination,
        handlers::catalog::delete_destination,
        handlers::catalog::list_treatments,
        handlers::catalog::get_treatment,
        handlers::catalog::create_treatment,
        handlers::catalog::update_treatment,
        handlers::catalog::delete_treatment,
        handlers::catalog::create_booking,
        handlers::search::search,
        handlers::journey::get_journey,
        handlers::journey::advance_journey,
        handlers::journey::complete_milestone,
        handlers::support::list_history,
        handlers::support::create_history,
        handlers::support::list_tickets,
        handlers::support::create_ticket,
        handlers::support::close_ticket,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        voyamed_store::Destination,
        voyamed_store::NewDestination,
        voyamed_store::Treatment,
        voyamed_store::NewTreatment,
        voyamed_store::Booking,
        voyamed_store::NewBooking,
        voyamed_store::PatientJourney,
        voyamed_store::JourneyMilestone,
        voyamed_store::MedicalHistoryEntry,
        voyamed_store::SupportTicket,
        voyamed_store::TicketStatus,
        dto::StageRes,
        dto::JourneyRes,
        dto::AdvanceJourneyReq,
        dto::SearchRes,
        dto::CreateHistoryReq,
        dto::CreateTicketReq,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/destinations",
            get(handlers::catalog::list_destinations).post(handlers::catalog::create_destination),
        )
        .route(
            "/destinations/:id",
            get(handlers::catalog::get_destination)
                .put(handlers::catalog::update_destination)
                .delete(handlers::catalog::delete_destination),
        )
        .route(
            "/treatments",
            get(handlers::catalog::list_treatments).post(handlers::catalog::create_treatment),
        )
        .route(
            "/treatments/:id",
            get(handlers::catalog::get_treatment)
                .put(handlers::catalog::update_treatment)
                .delete(handlers::catalog::delete_treatment),
        )
        .route("/bookings", post(handlers::catalog::create_booking))
        .route("/search", get(handlers::search::search))
        .route("/journey/:user_id", get(handlers::journey::get_journey))
        .route(
            "/journey/:user_id/advance",
            post(handlers::journey::advance_journey),
        )
        .route(
            "/milestones/:id/complete",
            post(handlers::journey::complete_milestone),
        )
        .route(
            "/history/:user_id",
            get(handlers::support::list_history).post(handlers::support::create_history),
        )
        .route(
            "/tickets/:user_id",
            get(handlers::support::list_tickets).post(handlers::support::create_ticket),
        )
        .route("/tickets/:id/close", post(handlers::support::close_ticket))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use voyamed_store::{MemoryBackend, StoreError};

    const ADMIN_KEY: &str = "admin-key";

    fn test_state() -> (Arc<MemoryBackend>, AppState) {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            "destinations",
            vec![json!({
                "id": "d-1", "name": "Bangkok", "city": "Bangkok", "country": "Thailand",
                "rating": 4.8, "image_url": null, "savings_percentage": 65, "description": null
            })],
        );
        backend.seed(
            "treatments",
            vec![json!({
                "id": "t-1", "name": "Knee Replacement", "category": "Orthopedics",
                "procedure_count": 12, "icon_name": null, "color": null, "description": null
            })],
        );
        backend.register_rpc("advance_patient_journey", |tables, args| {
            let rows = tables.entry("patient_journeys".to_owned()).or_default();
            let row = rows
                .iter_mut()
                .find(|row| row["user_id"] == args["user_id"])
                .ok_or_else(|| StoreError::Rpc {
                    function: "advance_patient_journey".into(),
                    message: "no journey for user".into(),
                })?;
            row["journey_stage"] = args["new_stage"].clone();
            row["current_step"] = json!(row["current_step"].as_u64().unwrap_or(0) + 1);
            Ok(Value::Null)
        });
        let state = AppState::new(backend.clone(), ADMIN_KEY.to_owned());
        (backend, state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let (_backend, state) = test_state();
        let response = router(state).oneshot(get("/health")).await.expect("health");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], json!(true));
    }

    #[tokio::test]
    async fn missing_destination_is_404() {
        let (_backend, state) = test_state();
        let response = router(state)
            .oneshot(get("/destinations/nope"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn catalog_mutation_requires_api_key() {
        let (_backend, state) = test_state();
        let body = json!({
            "name": "Izmir", "city": "Izmir", "country": "Turkey", "rating": 4.5,
            "image_url": null, "savings_percentage": 50, "description": null
        });

        let response = router(state.clone())
            .oneshot(post_json("/destinations", body.clone()))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut authed = post_json("/destinations", body);
        authed
            .headers_mut()
            .insert("x-api-key", ADMIN_KEY.parse().expect("header"));
        let response = router(state).oneshot(authed).await.expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn search_returns_per_category_counts() {
        let (_backend, state) = test_state();
        let response = router(state)
            .oneshot(get("/search?q=th"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["destination_count"], json!(1));
        assert_eq!(body["treatment_count"], json!(1));
    }

    #[tokio::test]
    async fn short_search_query_is_empty_without_store_calls() {
        let (backend, state) = test_state();
        let before = backend.call_count();

        let response = router(state)
            .oneshot(get("/search?q=a"))
            .await
            .expect("response");
        let body = body_json(response).await;

        assert_eq!(backend.call_count(), before);
        assert_eq!(body["destination_count"], json!(0));
        assert_eq!(body["treatment_count"], json!(0));
    }

    #[tokio::test]
    async fn first_journey_fetch_creates_the_initial_state() {
        let (_backend, state) = test_state();
        let response = router(state)
            .oneshot(get("/journey/u-1"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["journey"]["journey_stage"], json!("initial_inquiry"));
        assert_eq!(body["journey"]["current_step"], json!(1));
        assert_eq!(body["journey"]["total_steps"], json!(16));
        assert_eq!(body["progress_percentage"], json!(6));
        assert_eq!(body["current_stage"]["id"], json!("initial_inquiry"));
        assert_eq!(body["next_stage"]["id"], json!("records_review"));
        assert_eq!(body["milestones"].as_array().expect("milestones").len(), 3);
    }

    #[tokio::test]
    async fn advance_moves_to_the_successor_stage() {
        let (_backend, state) = test_state();
        let app = router(state);

        // create the journey first
        app.clone()
            .oneshot(get("/journey/u-1"))
            .await
            .expect("create");

        let response = app
            .oneshot(post_json(
                "/journey/u-1/advance",
                json!({"new_stage": "records_review"}),
            ))
            .await
            .expect("advance");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["journey"]["journey_stage"], json!("records_review"));
        assert_eq!(body["journey"]["current_step"], json!(2));
    }

    #[tokio::test]
    async fn advance_to_non_successor_is_unprocessable() {
        let (_backend, state) = test_state();
        let app = router(state);
        app.clone()
            .oneshot(get("/journey/u-1"))
            .await
            .expect("create");

        let response = app
            .oneshot(post_json(
                "/journey/u-1/advance",
                json!({"new_stage": "treatment_booked"}),
            ))
            .await
            .expect("advance");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn advance_to_unknown_stage_is_bad_request() {
        let (_backend, state) = test_state();
        let response = router(state)
            .oneshot(post_json(
                "/journey/u-1/advance",
                json!({"new_stage": "post_op_party"}),
            ))
            .await
            .expect("advance");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn milestone_completion_round_trips() {
        let (_backend, state) = test_state();
        let app = router(state);

        let created = app
            .clone()
            .oneshot(get("/journey/u-1"))
            .await
            .expect("create");
        let body = body_json(created).await;
        let milestone_id = body["milestones"]
            .as_array()
            .expect("milestones")
            .iter()
            .find(|m| m["completed"] == json!(false))
            .expect("open milestone")["id"]
            .as_str()
            .expect("id")
            .to_owned();

        let response = app
            .oneshot(post_json(
                &format!("/milestones/{milestone_id}/complete"),
                json!({}),
            ))
            .await
            .expect("complete");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["completed"], json!(true));
        assert!(body["completed_at"].is_string());
    }

    #[tokio::test]
    async fn blank_ticket_subject_is_bad_request() {
        let (_backend, state) = test_state();
        let response = router(state)
            .oneshot(post_json(
                "/tickets/u-1",
                json!({"subject": "   ", "message": "Please help."}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tickets_open_and_close_over_http() {
        let (_backend, state) = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/tickets/u-1",
                json!({"subject": "Visa letter", "message": "Please send one."}),
            ))
            .await
            .expect("create");
        assert_eq!(response.status(), StatusCode::CREATED);
        let ticket = body_json(response).await;
        let id = ticket["id"].as_str().expect("id").to_owned();

        let response = app
            .oneshot(post_json(&format!("/tickets/{id}/close"), json!({})))
            .await
            .expect("close");
        let closed = body_json(response).await;
        assert_eq!(closed["status"], json!("closed"));
    }
}
