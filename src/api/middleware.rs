//! Cross-cutting request/response handling: CORS headers, error reporting,
//! panic recovery.

use std::any::Any;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{
    error::{ApiError, ErrorReport},
    state::AppState,
};

const ALLOW_METHODS: &str = "POST, GET, PUT, DELETE, OPTIONS, XMODIFY";
const ALLOW_HEADERS: &str = "X-Requested-With, X-HTTP-Method-Override, Content-Type, Accept";
const MAX_AGE_SECS: &str = "86400";

/// Permissive CORS on every response.
///
/// The request `Origin` is echoed back (or `*` when absent). Preflight
/// `OPTIONS` requests are answered here with 204.
pub async fn cors(request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut(), origin);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Central error reporting.
///
/// Handlers and extractors fail with [`ApiError`], whose response already
/// carries the generic client body plus an [`ErrorReport`]. This layer logs
/// the report server-side and counts the outcome. It only sees complete
/// response heads; a failure after the body has started streaming aborts
/// the connection inside hyper instead.
pub async fn handle_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    match response.extensions().get::<ErrorReport>() {
        Some(report) if report.status.is_server_error() => {
            tracing::error!(%method, %uri, status = %report.status, error = %report.detail, "Request failed");
            state.metrics.request_failed();
        }
        Some(report) if report.status == StatusCode::NOT_FOUND => {
            tracing::debug!(%method, %uri, error = %report.detail, "Not found");
            state.metrics.not_found();
        }
        Some(report) => {
            tracing::warn!(%method, %uri, status = %report.status, error = %report.detail, "Request rejected");
        }
        None => state.metrics.request_served(),
    }

    response
}

/// Turns a handler panic into the same 500 response as any other failure
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
