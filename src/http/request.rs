//! Request identification and body capture.
//!
//! # Responsibilities
//! - Tag every request with an x-request-id header
//! - Buffer the inbound body so it can be read again by the forwarder
//! - Extract the routing key from the buffered JSON body
//!
//! # Design Decisions
//! - The body is buffered exactly once, bounded by the configured limit;
//!   both the key extraction and the forwarder read from the same bytes
//! - Decode failures never fail the request: the key falls back to empty
//!   and the request routes to the default origin

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::HeaderValue;
use serde::Deserialize;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::http::response::ProxyError;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The recognized request body shape. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RequestPayload {
    #[serde(default)]
    pub proxy_condition: String,
}

/// Buffer the request body and extract the routing key from it.
///
/// Reads the entire body into memory (bounded by `limit`), then rebuilds
/// the request with a fresh body over the same bytes, so the forwarder
/// sends the origin exactly what the caller sent. A body that is not
/// valid JSON, or whose `proxy_condition` field is missing or not a
/// string, yields an empty key rather than an error.
pub async fn buffer_and_extract(
    request: Request,
    limit: usize,
) -> Result<(Request, String), ProxyError> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(ProxyError::BodyRead)?;

    let key = extract_routing_key(&bytes);

    Ok((Request::from_parts(parts, Body::from(bytes)), key))
}

fn extract_routing_key(bytes: &Bytes) -> String {
    serde_json::from_slice::<RequestPayload>(bytes)
        .map(|payload| payload.proxy_condition)
        .unwrap_or_default()
}

/// Tower layer that assigns a UUID v4 request ID to requests lacking one.
#[derive(Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Middleware service behind [`RequestIdLayer`].
#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<axum::http::Request<B>> for RequestIdService<S>
where
    S: Service<axum::http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        if !req.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_body(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(request: Request) -> Bytes {
        axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn restored_body_is_byte_identical() {
        let original = r#"{"proxy_condition":"a","extra":[1,2,3]}"#;
        let (request, key) = buffer_and_extract(request_with_body(original), 1024)
            .await
            .unwrap();

        assert_eq!(key, "a");
        assert_eq!(&body_bytes(request).await[..], original.as_bytes());
    }

    #[tokio::test]
    async fn missing_field_yields_empty_key() {
        let (_, key) = buffer_and_extract(request_with_body(r#"{"other":"x"}"#), 1024)
            .await
            .unwrap();
        assert_eq!(key, "");
    }

    #[tokio::test]
    async fn invalid_json_yields_empty_key_and_keeps_body() {
        let original = "definitely not json";
        let (request, key) = buffer_and_extract(request_with_body(original), 1024)
            .await
            .unwrap();

        assert_eq!(key, "");
        assert_eq!(&body_bytes(request).await[..], original.as_bytes());
    }

    #[tokio::test]
    async fn non_string_condition_yields_empty_key() {
        let (_, key) = buffer_and_extract(request_with_body(r#"{"proxy_condition":42}"#), 1024)
            .await
            .unwrap();
        assert_eq!(key, "");
    }

    #[tokio::test]
    async fn empty_body_yields_empty_key() {
        let (request, key) = buffer_and_extract(request_with_body(""), 1024).await.unwrap();
        assert_eq!(key, "");
        assert!(body_bytes(request).await.is_empty());
    }

    #[tokio::test]
    async fn oversize_body_is_a_read_failure() {
        let result = buffer_and_extract(request_with_body("0123456789"), 4).await;
        assert!(matches!(result, Err(ProxyError::BodyRead(_))));
    }
}
