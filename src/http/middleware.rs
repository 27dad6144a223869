//! Cross-cutting request middleware.

use axum::{
    body::Body,
    http::{header, uri::PathAndQuery, HeaderMap, Method, Request, Uri},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

use crate::http::request::request_id;

/// Paths served by the gateway itself rather than an upstream.
const LOCAL_PATHS: [&str; 3] = ["/", "/health", "/debug"];

/// Log every inbound request before routing.
pub async fn log_incoming(request: Request<Body>, next: Next) -> Response {
    let id = request_id(request.headers());
    tracing::info!(
        request_id = %id,
        method = %request.method(),
        uri = %request.uri(),
        "Incoming request"
    );
    tracing::debug!(
        request_id = %id,
        headers = ?request.headers(),
        content_length = ?declared_length(request.headers()),
        "Request headers"
    );

    next.run(request).await
}

/// Body length announced by the client; bodies themselves are streamed, not read.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Canonical spelling of a local endpoint path, if `path` names one.
///
/// Case and trailing slashes are ignored: `/Health/` → `/health`.
fn local_path(path: &str) -> Option<&'static str> {
    let trimmed = path.trim_end_matches('/');
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
    LOCAL_PATHS
        .into_iter()
        .find(|local| local.eq_ignore_ascii_case(trimmed))
}

/// Rewrite `/Health/`, `/DEBUG` and friends to their canonical path so the
/// exact routes serve them. Must run in front of the router.
pub fn normalize_local_path(mut request: Request<Body>) -> Request<Body> {
    let Some(canonical) = local_path(request.uri().path()) else {
        return request;
    };
    if canonical == request.uri().path() {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{}", canonical, query),
        None => canonical.to_string(),
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = PathAndQuery::try_from(path_and_query).ok();
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}

/// Permissive CORS: any origin, the common methods, requested headers mirrored.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
