//! Response relay.
//!
//! # Responsibilities
//! - Turn the upstream response into a client response
//! - Strip hop-by-hop headers
//!
//! # Design Decisions
//! - Streaming: the upstream body is wrapped, never buffered
//! - Status and end-to-end headers are copied unchanged

use axum::body::Body;
use axum::http::Response;

use crate::http::headers::strip_hop_by_hop;

/// Relay an upstream response to the client.
pub fn relay<B>(response: Response<B>) -> Response<Body>
where
    B: hyper::body::Body<Data = hyper::body::Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
