//! Upstream forwarding.
//!
//! # Responsibilities
//! - Vet the resolved origin URL before anything is dispatched
//! - Rewrite the outbound request: URI scheme and authority from the
//!   target, Host set to the target, X-Forwarded-Host preserving the
//!   caller-facing host
//! - Dispatch to the origin and stream the response back unmodified
//!
//! # Design Decisions
//! - One forwarding attempt per inbound request, no retries
//! - The inbound path and query are kept; only scheme and authority
//!   come from the target URL
//! - The rewrite step is pure so header handling is unit-testable

use axum::body::Body;
use axum::extract::Request;
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderValue, Uri};
use axum::response::Response;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;

use crate::http::response::ProxyError;

/// Shared hyper client used for all upstream requests.
pub type HttpClient = Client<HttpConnector, Body>;

/// Header recording the caller-facing host across the Host rewrite.
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Rewrite an inbound request so it targets `target`.
///
/// The request keeps its method, path, query, headers, and (restored)
/// body. An empty target is a configuration error and is rejected before
/// any connection is made, as is a target that does not parse as an
/// absolute URL.
pub fn rewrite_for_upstream(target: &str, request: Request) -> Result<Request, ProxyError> {
    if target.is_empty() {
        return Err(ProxyError::TargetUnconfigured);
    }

    let target_uri: Uri = target
        .parse()
        .map_err(|_| ProxyError::MalformedTarget(target.to_string()))?;
    let (scheme, authority) = match (target_uri.scheme().cloned(), target_uri.authority().cloned())
    {
        (Some(scheme), Some(authority)) => (scheme, authority),
        _ => return Err(ProxyError::MalformedTarget(target.to_string())),
    };

    let (mut parts, body) = request.into_parts();

    let original_host = parts.headers.get(header::HOST).cloned();

    let mut uri_parts = parts.uri.into_parts();
    uri_parts.scheme = Some(scheme);
    uri_parts.authority = Some(authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts)
        .map_err(|_| ProxyError::MalformedTarget(target.to_string()))?;

    if let Some(host) = original_host {
        parts.headers.insert(X_FORWARDED_HOST, host);
    }
    if let Ok(host) = HeaderValue::from_str(authority.as_str()) {
        parts.headers.insert(header::HOST, host);
    }

    Ok(Request::from_parts(parts, body))
}

/// Forward a request to its resolved origin, relaying the streamed
/// response. A single attempt; dispatch failures surface to the caller
/// as 502.
pub async fn forward(
    client: &HttpClient,
    target: &str,
    request: Request,
) -> Result<Response, ProxyError> {
    let request = rewrite_for_upstream(target, request)?;

    let response = client
        .request(request)
        .await
        .map_err(ProxyError::Upstream)?;

    Ok(response.map(Body::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound_request(uri: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::HOST, "caller.example")
            .body(Body::from(r#"{"proxy_condition":"a"}"#))
            .unwrap()
    }

    #[test]
    fn rewrites_scheme_authority_and_headers() {
        let rewritten =
            rewrite_for_upstream("https://a.internal", inbound_request("/some/path?x=1")).unwrap();

        assert_eq!(rewritten.uri().scheme_str(), Some("https"));
        assert_eq!(rewritten.uri().authority().unwrap().as_str(), "a.internal");
        assert_eq!(rewritten.uri().path_and_query().unwrap(), "/some/path?x=1");
        assert_eq!(rewritten.headers()[header::HOST], "a.internal");
        assert_eq!(rewritten.headers()[X_FORWARDED_HOST], "caller.example");
    }

    #[test]
    fn keeps_target_port_in_host_header() {
        let rewritten =
            rewrite_for_upstream("http://127.0.0.1:1331", inbound_request("/")).unwrap();

        assert_eq!(rewritten.uri().scheme_str(), Some("http"));
        assert_eq!(rewritten.headers()[header::HOST], "127.0.0.1:1331");
    }

    #[test]
    fn empty_target_is_rejected_before_dispatch() {
        let result = rewrite_for_upstream("", inbound_request("/"));
        assert!(matches!(result, Err(ProxyError::TargetUnconfigured)));
    }

    #[test]
    fn relative_target_is_malformed() {
        let result = rewrite_for_upstream("/not-absolute", inbound_request("/"));
        assert!(matches!(result, Err(ProxyError::MalformedTarget(_))));
    }

    #[test]
    fn garbage_target_is_malformed() {
        let result = rewrite_for_upstream("http://exa mple", inbound_request("/"));
        assert!(matches!(result, Err(ProxyError::MalformedTarget(_))));
    }

    #[test]
    fn missing_inbound_host_skips_forwarded_host() {
        let request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let rewritten = rewrite_for_upstream("http://a.internal", request).unwrap();

        assert!(rewritten.headers().get(X_FORWARDED_HOST).is_none());
        assert_eq!(rewritten.headers()[header::HOST], "a.internal");
    }
}
