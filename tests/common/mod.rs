//! Shared utilities for integration testing.

use std::net::SocketAddr;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use condition_proxy::config::ProxyConfig;
use condition_proxy::http::HttpServer;
use condition_proxy::lifecycle::Shutdown;

/// Start an origin that echoes what it received: its own name, the Host,
/// X-Forwarded-Host and x-request-id headers it saw, and the raw request
/// body. Binds an ephemeral port and returns it.
pub async fn start_echo_origin(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move |request: Request| async move {
        let (parts, body) = request.into_parts();
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let host = header("host");
        let forwarded_host = header("x-forwarded-host");
        let request_id = header("x-request-id");

        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();

        Json(json!({
            "origin": name,
            "host": host,
            "x_forwarded_host": forwarded_host,
            "request_id": request_id,
            "body": String::from_utf8_lossy(&bytes),
        }))
    });

    spawn_app(app).await
}

/// Start an origin that answers every request with a fixed status and body.
pub async fn start_fixed_origin(status: u16, body: &'static str) -> SocketAddr {
    let app = Router::new()
        .fallback(move || async move { (StatusCode::from_u16(status).unwrap(), body) });

    spawn_app(app).await
}

/// Start the proxy with the given origin URLs on an ephemeral port.
/// Returns its address and the shutdown handle keeping it alive.
pub async fn start_proxy(a_url: &str, b_url: &str, default_url: &str) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.origins.a_url = a_url.to_string();
    config.origins.b_url = b_url.to_string();
    config.origins.default_url = default_url.to_string();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

async fn spawn_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
