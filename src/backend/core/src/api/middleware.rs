//! API middleware for content-type enforcement, request ids and request metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{
        header::{HeaderName, HeaderValue, CONTENT_TYPE},
        Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{CampusError, ErrorCode};
use crate::telemetry::RequestDurationHistogram;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Rejects mutation requests whose declared body is not JSON.
///
/// POST, PUT and PATCH requests with a `Content-Type` other than
/// `application/json` get a 415. A request with no `Content-Type` passes
/// through: routes that read a body reject it in the JSON extractor, and
/// body-less commands such as `POST /init-db` still work.
pub async fn content_type_validation(req: Request, next: Next) -> Response {
    if matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH) {
        if let Some(content_type) = req.headers().get(CONTENT_TYPE) {
            let ct_str = content_type.to_str().unwrap_or("");
            if !ct_str.starts_with("application/json") {
                return CampusError::new(
                    ErrorCode::UnsupportedMediaType,
                    "Content-Type must be application/json",
                )
                .with_context("content_type", ct_str)
                .into_response();
            }
        }
    }
    next.run(req).await
}

/// Propagates `x-request-id`, generating one when the client sent none.
///
/// The id is written into the request before inner layers run, so the trace
/// span can pick it up, and echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(val) = &header_value {
        req.headers_mut().insert(REQUEST_ID_HEADER, val.clone());
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    // Headers the handler already set win.
    if let Some(val) = header_value {
        headers.entry(REQUEST_ID_HEADER).or_insert(val);
    }
    headers
        .entry(HeaderName::from_static("x-content-type-options"))
        .or_insert(HeaderValue::from_static("nosniff"));

    response
}

/// Records request count and latency, labelled by route template.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    RequestDurationHistogram::record(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
