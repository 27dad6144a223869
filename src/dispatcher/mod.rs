//! Request dispatch to upstream services.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → routing (longest prefix → RouteEntry, or RouteNotFound)
//!     → target URL = upstream base + original path + query
//!     → hooks.on_request
//!     → forward (method, end-to-end headers, streaming body)
//!     → hooks.on_response / hooks.on_error
//!     → relay status, headers, body
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing is shared between dispatches except the read-only
//!   route table and the pooled HTTP client
//! - No retries; every failure is terminal for the request
//! - Dropping the dispatch future (client went away) drops the upstream call

pub mod hooks;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{request::Parts, Method, Request, Response, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::GatewayConfig;
use crate::error::{error_chain, GatewayError};
use crate::http::headers::forward_request_headers;
use crate::http::request::request_id;
use crate::http::response::relay;
use crate::routing::{RouteEntry, Router};

pub use hooks::{DispatchContext, DispatchHook, LoggingHook, MetricsHook};

/// Forwards requests to the upstream selected by path prefix.
pub struct Dispatcher {
    router: Arc<Router>,
    client: Client<HttpConnector, Body>,
    upstream_timeout: Option<Duration>,
    hooks: Vec<Box<dyn DispatchHook>>,
}

impl Dispatcher {
    /// Create a dispatcher with the default logging and metrics hooks.
    pub fn new(router: Router, upstream_timeout: Option<Duration>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            router: Arc::new(router),
            client,
            upstream_timeout,
            hooks: hooks::default_hooks(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            Router::from_config(&config.services),
            config.timeouts.upstream_secs.map(Duration::from_secs),
        )
    }

    /// Append an observer hook; hooks run in the order added.
    pub fn with_hook(mut self, hook: impl DispatchHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch one inbound request and relay the upstream response.
    pub async fn dispatch(&self, request: Request<Body>) -> Result<Response<Body>, GatewayError> {
        let started = Instant::now();
        let (parts, body) = request.into_parts();

        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let route = match self.router.match_path(parts.uri.path()) {
            Some(route) => route,
            None => return Err(self.route_not_found(&parts.method, path, started)),
        };

        let request_id = request_id(&parts.headers);
        let target = route.target_url(&path);
        let ctx = DispatchContext {
            request_id: &request_id,
            method: &parts.method,
            path: &path,
            route,
            target: &target,
            started,
        };

        for hook in &self.hooks {
            hook.on_request(&ctx, &parts.headers);
        }

        let outbound = build_outbound(&target, &parts, body);
        let result = match outbound {
            Ok(outbound) => self.forward(route, outbound).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(response) => {
                for hook in &self.hooks {
                    hook.on_response(&ctx, response.status(), response.headers());
                }
            }
            Err(error) => {
                for hook in &self.hooks {
                    hook.on_error(&ctx, error);
                }
            }
        }

        result
    }

    /// Report an unrouted request to the hooks and build its 404.
    pub fn route_not_found(&self, method: &Method, path: String, started: Instant) -> GatewayError {
        for hook in &self.hooks {
            hook.on_not_found(method, &path, started);
        }
        GatewayError::RouteNotFound {
            method: method.to_string(),
            path,
        }
    }

    async fn forward(
        &self,
        route: &RouteEntry,
        outbound: Request<Body>,
    ) -> Result<Response<Body>, GatewayError> {
        let unavailable = |details: String| GatewayError::UpstreamUnavailable {
            service: route.display_name(),
            details,
        };

        let call = self.client.request(outbound);
        let response = match self.upstream_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                unavailable(format!("upstream did not respond within {}s", limit.as_secs()))
            })?,
            None => call.await,
        }
        .map_err(|e| unavailable(error_chain(&e)))?;

        Ok(relay(response))
    }
}

/// Build the upstream request: same method, end-to-end headers, same body.
fn build_outbound(target: &str, parts: &Parts, body: Body) -> Result<Request<Body>, GatewayError> {
    let uri: Uri = target
        .parse()
        .map_err(|e| GatewayError::internal(format!("invalid upstream URI '{}': {}", target, e)))?;

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        *headers = forward_request_headers(parts.headers.clone());
    }

    builder
        .body(body)
        .map_err(|e| GatewayError::internal(format!("failed to build upstream request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use axum::http::{HeaderMap, Method, StatusCode};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct RecordingHook(Arc<Mutex<Vec<String>>>);

    impl DispatchHook for RecordingHook {
        fn on_request(&self, ctx: &DispatchContext<'_>, _headers: &HeaderMap) {
            self.0.lock().unwrap().push(format!("request {}", ctx.target));
        }

        fn on_response(&self, _ctx: &DispatchContext<'_>, status: StatusCode, _headers: &HeaderMap) {
            self.0.lock().unwrap().push(format!("response {}", status.as_u16()));
        }

        fn on_error(&self, _ctx: &DispatchContext<'_>, error: &GatewayError) {
            self.0.lock().unwrap().push(format!("error {}", error.status_code().as_u16()));
        }

        fn on_not_found(&self, method: &Method, path: &str, _started: Instant) {
            self.0.lock().unwrap().push(format!("not found {} {}", method, path));
        }
    }

    async fn start_echo_backend() -> String {
        let app = axum::Router::new().fallback(
            |method: Method, uri: Uri, headers: HeaderMap, body: String| async move {
                let host = headers
                    .get("host")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                (
                    StatusCode::ACCEPTED,
                    [("x-backend", "echo")],
                    format!("{} {} host={} body={}", method, uri, host, body),
                )
            },
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn forwards_path_query_method_and_body() {
        let url = start_echo_backend().await;
        let authority = url.trim_start_matches("http://").to_string();
        let hook = RecordingHook::default();
        let dispatcher = Dispatcher::new(
            Router::new(vec![RouteEntry::new("products", "/api/products", &url)]),
            None,
        )
        .with_hook(hook.clone());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/products/42?color=red")
            .header("host", "gateway.local")
            .body(Body::from("hello"))
            .unwrap();

        let response = dispatcher.dispatch(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["x-backend"], "echo");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            format!("POST /api/products/42?color=red host={} body=hello", authority)
        );

        let events = hook.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                format!("request {}/api/products/42?color=red", url),
                "response 202".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unmatched_path_is_route_not_found() {
        let hook = RecordingHook::default();
        let dispatcher = Dispatcher::new(
            Router::new(vec![RouteEntry::new("search", "/api/search", "http://127.0.0.1:1")]),
            None,
        )
        .with_hook(hook.clone());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/orders?page=2")
            .body(Body::empty())
            .unwrap();

        match dispatcher.dispatch(request).await {
            Err(GatewayError::RouteNotFound { method, path }) => {
                assert_eq!(method, "GET");
                assert_eq!(path, "/api/orders?page=2");
            }
            other => panic!("expected RouteNotFound, got {:?}", other.map(|r| r.status())),
        }
        assert_eq!(*hook.0.lock().unwrap(), vec!["not found GET /api/orders?page=2".to_string()]);
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let url = refused_url().await;
        let hook = RecordingHook::default();
        let dispatcher = Dispatcher::new(
            Router::new(vec![RouteEntry::new("newsletter", "/api/newsletter", &url)]),
            None,
        )
        .with_hook(hook.clone());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/newsletter/subscribe")
            .body(Body::from(r#"{"email":"a@b.c"}"#))
            .unwrap();

        let err = dispatcher.dispatch(request).await.unwrap_err();
        match &err {
            GatewayError::UpstreamUnavailable { service, details } => {
                assert_eq!(service, "Newsletter");
                assert!(!details.is_empty());
            }
            other => panic!("expected UpstreamUnavailable, got {other:?}"),
        }
        assert_eq!(hook.0.lock().unwrap().last().unwrap(), "error 503");
    }

    #[tokio::test]
    async fn slow_upstream_times_out_when_configured() {
        let app = axum::Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dispatcher = Dispatcher::new(
            Router::new(vec![RouteEntry::new(
                "search",
                "/api/search",
                format!("http://{}", addr),
            )]),
            Some(Duration::from_millis(200)),
        );

        let request = Request::builder()
            .uri("/api/search/suggestions?q=lamp")
            .body(Body::empty())
            .unwrap();

        let err = dispatcher.dispatch(request).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamUnavailable { .. }));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn outbound_request_strips_host_and_keeps_method() {
        let (parts, body) = Request::builder()
            .method(Method::PUT)
            .uri("/api/products/1")
            .header("host", "gateway.local")
            .header("connection", "keep-alive")
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let outbound = build_outbound("http://products:3000/api/products/1", &parts, body).unwrap();

        assert_eq!(outbound.method(), Method::PUT);
        assert_eq!(outbound.uri(), "http://products:3000/api/products/1");
        assert!(outbound.headers().get("host").is_none());
        assert!(outbound.headers().get("connection").is_none());
        assert_eq!(outbound.headers()["x-request-id"], "abc");
    }

    #[test]
    fn invalid_target_is_internal_error() {
        let (parts, body) = Request::builder()
            .uri("/api/products")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let err = build_outbound("http://bad host/api/products", &parts, body).unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
    }
}
