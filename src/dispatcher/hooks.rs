//! Observer hooks run around each forwarded request.
//!
//! Hooks observe, they never alter the request or the outcome. They run in
//! registration order before forwarding, after an upstream response arrives,
//! and when forwarding fails. Requests that match no route get `on_not_found`
//! instead.

use std::time::Instant;

use axum::http::{HeaderMap, Method, StatusCode};

use crate::error::GatewayError;
use crate::observability::metrics;
use crate::routing::RouteEntry;

/// What a hook sees about the request being dispatched.
#[derive(Debug)]
pub struct DispatchContext<'a> {
    pub request_id: &'a str,
    pub method: &'a Method,
    /// Original path and query as received.
    pub path: &'a str,
    pub route: &'a RouteEntry,
    /// Outbound URL the request is forwarded to.
    pub target: &'a str,
    pub started: Instant,
}

pub trait DispatchHook: Send + Sync {
    fn on_request(&self, _ctx: &DispatchContext<'_>, _headers: &HeaderMap) {}

    fn on_response(&self, _ctx: &DispatchContext<'_>, _status: StatusCode, _headers: &HeaderMap) {}

    fn on_error(&self, _ctx: &DispatchContext<'_>, _error: &GatewayError) {}

    /// No route serves `method` on `path`; the caller answers 404.
    fn on_not_found(&self, _method: &Method, _path: &str, _started: Instant) {}
}

/// Structured log lines for every proxied request.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHook;

impl DispatchHook for LoggingHook {
    fn on_request(&self, ctx: &DispatchContext<'_>, headers: &HeaderMap) {
        tracing::info!(
            request_id = %ctx.request_id,
            service = %ctx.route.name,
            method = %ctx.method,
            target = %ctx.target,
            "Proxying request"
        );
        tracing::debug!(request_id = %ctx.request_id, headers = ?headers, "Forwarded request headers");
    }

    fn on_response(&self, ctx: &DispatchContext<'_>, status: StatusCode, headers: &HeaderMap) {
        tracing::info!(
            request_id = %ctx.request_id,
            service = %ctx.route.name,
            status = status.as_u16(),
            method = %ctx.method,
            path = %ctx.path,
            elapsed_ms = ctx.started.elapsed().as_millis() as u64,
            "Response received"
        );
        tracing::debug!(request_id = %ctx.request_id, headers = ?headers, "Upstream response headers");
    }

    fn on_error(&self, ctx: &DispatchContext<'_>, error: &GatewayError) {
        tracing::error!(
            request_id = %ctx.request_id,
            service = %ctx.route.name,
            method = %ctx.method,
            path = %ctx.path,
            target = %ctx.target,
            error = %error,
            "Proxy error"
        );
    }

    fn on_not_found(&self, method: &Method, path: &str, _started: Instant) {
        tracing::warn!(method = %method, path = %path, "Route not found");
    }
}

/// Request counters and latency histograms.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsHook;

impl DispatchHook for MetricsHook {
    fn on_response(&self, ctx: &DispatchContext<'_>, status: StatusCode, _headers: &HeaderMap) {
        metrics::record_request(ctx.method.as_str(), status.as_u16(), &ctx.route.name, ctx.started);
    }

    fn on_error(&self, ctx: &DispatchContext<'_>, error: &GatewayError) {
        metrics::record_request(
            ctx.method.as_str(),
            error.status_code().as_u16(),
            &ctx.route.name,
            ctx.started,
        );
    }

    fn on_not_found(&self, method: &Method, _path: &str, started: Instant) {
        metrics::record_request(method.as_str(), StatusCode::NOT_FOUND.as_u16(), "none", started);
    }
}

/// Hooks installed on a default dispatcher.
pub fn default_hooks() -> Vec<Box<dyn DispatchHook>> {
    vec![Box::new(LoggingHook), Box::new(MetricsHook)]
}
