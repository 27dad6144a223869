//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the informational handlers
//! - Normalise informational paths before routing
//! - Wire up middleware (tracing, request ID, CORS, request logging)
//! - Send every other request to the dispatcher
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{body::Body, http::Request, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::dispatcher::Dispatcher;
use crate::http::handlers::{debug, health, not_found, proxy, root};
use crate::http::middleware::{cors_layer, log_incoming, normalize_local_path};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub dispatcher: Arc<Dispatcher>,
}

/// The router behind its path-normalising front layer.
pub type GatewayService = MapRequest<Router, fn(Request<Body>) -> Request<Body>>;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let dispatcher = Dispatcher::from_config(&config);
        Self::with_dispatcher(config, dispatcher)
    }

    /// Create a server around a pre-built dispatcher (custom hooks).
    pub fn with_dispatcher(config: GatewayConfig, dispatcher: Dispatcher) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            dispatcher: Arc::new(dispatcher),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(root).fallback(not_found))
            .route("/health", get(health).fallback(not_found))
            .route("/debug", get(debug).fallback(not_found))
            .fallback(proxy)
            .with_state(state)
            .layer(middleware::from_fn(log_incoming))
            .layer(cors_layer())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let service = axum::ServiceExt::<Request<Body>>::into_make_service(self.service());
        axum::serve(listener, service)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The complete service as served, path normalisation included.
    ///
    /// Router layers only see a request after it has been matched, so the
    /// rewrite has to wrap the router from outside.
    pub fn service(&self) -> GatewayService {
        let normalize: fn(Request<Body>) -> Request<Body> = normalize_local_path;
        MapRequestLayer::new(normalize).layer(self.router.clone())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
