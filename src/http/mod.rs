//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned / kept)
//!     → middleware.rs (CORS, incoming request log)
//!     → handlers.rs (/, /health, /debug) or dispatcher fallback
//!     → headers.rs (hop-by-hop filtering) + response.rs (relay)
//!     → Send to client
//! ```

pub mod handlers;
pub mod headers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
