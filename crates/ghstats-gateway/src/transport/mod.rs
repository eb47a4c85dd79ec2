//! Transport layer (HTTP/HTTPS).
//!
//! Exposes the stats handler, the error-to-status mapping, and the rustls
//! server config used when the gateway is configured for https.

pub mod http;
pub mod tls;
