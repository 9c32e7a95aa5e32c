//! Condition-Based Reverse Proxy Library
//!
//! Inspects the `proxy_condition` field of an inbound request's JSON body,
//! maps it to one of three statically configured origins (A, B, default),
//! and forwards the request there, relaying the origin's response.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
