//! Per-request error taxonomy and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::http::handlers::available_routes;

/// Terminal per-request failures. None are retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No route prefix matched the request path.
    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// The upstream refused the connection, timed out or failed in transit.
    #[error("{service} service unavailable: {details}")]
    UpstreamUnavailable { service: String, details: String },

    /// Unexpected fault inside the gateway's forwarding path.
    #[error("Internal gateway error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            GatewayError::RouteNotFound { method, path } => json!({
                "error": "Route not found",
                "method": method,
                "path": path,
                "availableRoutes": available_routes(),
            }),
            GatewayError::UpstreamUnavailable { service, details } => json!({
                "error": format!("{} service unavailable", service),
                "details": details,
            }),
            GatewayError::Internal(details) => json!({
                "error": "Internal gateway error",
                "details": details,
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Flatten an error and its `source()` chain into one line.
///
/// hyper's top-level errors ("client error (Connect)") hide the OS detail
/// ("Connection refused") in the chain.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}
