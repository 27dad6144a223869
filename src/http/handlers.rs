//! Informational endpoints and the proxy fallback.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{Method, Request, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::GatewayError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub services: Map<String, Value>,
}

/// Endpoints advertised by `/` and by 404 responses.
pub fn available_routes() -> Value {
    json!({
        "health": "GET /health",
        "debug": "GET /debug",
        "products": "GET /api/products",
        "newsletter": "POST /api/newsletter/subscribe",
        "searchSuggestions": "GET /api/search/suggestions?q=query",
    })
}

fn service_urls(state: &AppState) -> Map<String, Value> {
    state
        .config
        .services
        .iter()
        .map(|s| (s.name.clone(), Value::String(s.url.clone())))
        .collect()
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Gateway API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": available_routes(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        message: "Gateway is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        services: service_urls(&state),
    })
}

pub async fn debug(State(state): State<AppState>) -> Json<Value> {
    let routes: Map<String, Value> = state
        .config
        .services
        .iter()
        .map(|s| {
            let route = format!("{}{}", s.url.trim_end_matches('/'), s.path_prefix);
            (s.name.clone(), Value::String(route))
        })
        .collect();

    Json(json!({
        "services": service_urls(&state),
        "routes": routes,
        "environment": {
            "PORT": state.config.listener.port.to_string(),
            "APP_ENV": state.config.environment,
        },
    }))
}

/// Unsupported method on an informational endpoint.
pub async fn not_found(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> GatewayError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.dispatcher.route_not_found(&method, path, Instant::now())
}

/// Everything not served locally goes through the dispatcher.
pub async fn proxy(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response<Body>, GatewayError> {
    state.dispatcher.dispatch(request).await
}
