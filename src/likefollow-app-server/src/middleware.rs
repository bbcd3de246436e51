//! HTTP middleware components.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request ID header name.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Request timing header name.
pub const REQUEST_TIMING_HEADER: &str = "X-Response-Time";

/// Request ID type.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Request ID middleware - adds unique ID to each request.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Timing middleware - tracks request duration.
pub async fn timing_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    if let Ok(value) = HeaderValue::from_str(&format!("{duration_ms:.2}ms")) {
        response.headers_mut().insert(REQUEST_TIMING_HEADER, value);
    }

    let status = response.status();
    if status.is_success() {
        info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %format!("{:.2}", duration_ms),
            "Request completed"
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %format!("{:.2}", duration_ms),
            "Client error"
        );
    } else {
        error!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %format!("{:.2}", duration_ms),
            "Server error"
        );
    }

    response
}

/// Timeout middleware.
pub async fn timeout_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let timeout_duration = state.config.request_timeout_duration();

    match timeout(timeout_duration, next.run(request)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            error!("Request timed out after {:?}", timeout_duration);
            Err(AppError::Timeout)
        }
    }
}

/// Content type validation middleware.
pub async fn content_type_middleware(request: Request, next: Next) -> AppResult<Response> {
    // Only validate POST/PUT/PATCH requests
    if matches!(
        request.method(),
        &Method::POST | &Method::PUT | &Method::PATCH
    ) {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.is_empty() && !content_type.starts_with("application/json") {
            warn!("Unsupported content type: {}", content_type);
            return Err(AppError::UnsupportedMediaType(content_type.to_string()));
        }
    }

    Ok(next.run(request).await)
}

/// Request body size limit middleware.
pub async fn body_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let max_size = state.config.max_body_size;

    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if let Some(content_length) = content_length {
        if content_length > max_size {
            warn!(
                "Request body too large: {} bytes (max: {})",
                content_length, max_size
            );
            return Err(AppError::PayloadTooLarge);
        }
    }

    Ok(next.run(request).await)
}

/// CORS configuration.
///
/// An empty origin list, or one containing `*`, allows every origin. The
/// request origin is echoed back rather than sent as `*` so credentials stay
/// allowed. Preflight responses are cached by browsers for 24 hours.
pub fn cors_layer(origins: &[String]) -> tower_http::cors::CorsLayer {
    use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

    let allow_origin = if allows_any_origin(origins) {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

fn allows_any_origin(origins: &[String]) -> bool {
    origins.is_empty() || origins.iter().any(|o| o == "*")
}
