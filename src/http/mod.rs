//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, pipeline composition)
//!     → request.rs (request ID, body capture, key extraction)
//!     → [routing resolves the origin]
//!     → forward.rs (rewrite, dispatch, response relay)
//!     → response.rs (failure → status code mapping)
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use response::ProxyError;
pub use server::HttpServer;
