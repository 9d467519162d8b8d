//! HTTP API for the campus service.
//!
//! JSON in, JSON out. Errors render as
//! `{"success": false, "error": {...}}` via [`CampusError`]; successful list
//! and report endpoints return bare JSON arrays.

mod handlers;
pub mod middleware;
pub mod routes;

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts},
    http::Request,
    middleware as axum_middleware,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::Database;
use crate::error::CampusError;

pub use handlers::{
    CreateEventRequest, CreateStudentRequest, Created, FeedbackRequest, InitDbResponse,
    ParticipationRequest,
};

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// JSON body extractor whose rejections render as [`CampusError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(CampusError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as [`CampusError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CampusError))]
pub struct ApiPath<T>(pub T);

/// Build the API router with middleware.
///
/// Layers, outermost first: CORS, compression, request id, trace span,
/// content-type check. Request metrics are a route layer so they see the
/// matched route template.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
            .headers()
            .get(&middleware::REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %request_id,
        )
    });

    routes::campus_router()
        .route_layer(axum_middleware::from_fn(middleware::track_metrics))
        .layer(axum_middleware::from_fn(middleware::content_type_validation))
        .layer(trace)
        .layer(axum_middleware::from_fn(middleware::request_id))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
