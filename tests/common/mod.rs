//! Shared utilities for gateway integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_gateway::config::{GatewayConfig, ServiceConfig};
use api_gateway::{HttpServer, Shutdown};
use axum::http::{HeaderMap, Method, Uri};
use axum::Json;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One request as seen by a mock upstream.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// A mock upstream that echoes every request as JSON and records it.
#[derive(Clone)]
pub struct EchoBackend {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl EchoBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start an echo backend on an ephemeral port.
pub async fn start_echo_backend(name: &'static str) -> EchoBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = requests.clone();

    let app = axum::Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
            let log = log.clone();
            async move {
                let echoed: serde_json::Map<String, Value> = headers
                    .iter()
                    .map(|(k, v)| {
                        (k.to_string(), Value::String(v.to_str().unwrap_or_default().to_string()))
                    })
                    .collect();

                log.lock().unwrap().push(Recorded {
                    method: method.to_string(),
                    uri: uri.to_string(),
                    headers,
                    body: body.clone(),
                });

                Json(json!({
                    "service": name,
                    "method": method.as_str(),
                    "uri": uri.to_string(),
                    "headers": echoed,
                    "body": body,
                }))
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    EchoBackend { addr, requests }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Gateway config pointing the three services at the given URLs.
pub fn gateway_config(products: &str, newsletter: &str, search: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.services = vec![
        ServiceConfig::new("products", "/api/products", products),
        ServiceConfig::new("newsletter", "/api/newsletter", newsletter),
        ServiceConfig::new("search", "/api/search", search),
    ];
    config
}

/// A running gateway; dropping it does not stop the server, call `stop`.
pub struct RunningGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
