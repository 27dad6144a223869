use std::net::SocketAddr;

use tokio::net::TcpListener;

use api_gateway::config::{self, GatewayConfig};
use api_gateway::observability::{logging, metrics};
use api_gateway::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init_tracing("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init_tracing(&config.observability.log_level);

    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    for service in &config.services {
        tracing::info!(
            service = %service.name,
            prefix = %service.path_prefix,
            url = %service.url,
            "Upstream configured"
        );
    }
    tracing::info!(
        environment = %config.environment,
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    log_endpoints(&config, local_addr);

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(metrics_address = %addr, error = %e, "Failed to parse metrics address"),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn log_endpoints(config: &GatewayConfig, addr: SocketAddr) {
    let base = format!("http://localhost:{}", addr.port());
    tracing::info!(address = %addr, "Gateway API listening");
    tracing::info!("Health check: {}/health", base);
    tracing::info!("Debug info: {}/debug", base);
    for service in &config.services {
        tracing::info!("{} API: {}{}", service.name, base, service.path_prefix);
    }
}
