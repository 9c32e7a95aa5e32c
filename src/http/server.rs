//! HTTP server setup and request pipeline.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (timeout, request ID, tracing)
//! - Compose the per-request pipeline: capture body → resolve origin →
//!   forward and relay
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::{self, HttpClient};
use crate::http::request::{self, RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::ConditionRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ConditionRouter>,
    pub client: HttpClient,
    pub max_body_bytes: usize,
}

/// HTTP server for the condition proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let condition_router = Arc::new(ConditionRouter::from_config(&config.origins));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            router: condition_router,
            client,
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
///
/// Per-request pipeline, strictly ordered: the body is captured and the
/// routing key extracted, the origin is resolved, and only then does the
/// first byte go upstream.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        peer = %peer,
        method = %method,
        path = %path,
        "Proxying request"
    );

    // 1. Capture the body and pull the routing key out of it
    let (request, key) = match request::buffer_and_extract(request, state.max_body_bytes).await {
        Ok(buffered) => buffered,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to buffer request body");
            metrics::record_request(&method, e.status().as_u16(), "none", start_time);
            return e.into_response();
        }
    };

    // 2. Resolve the target origin
    let target = state.router.resolve(&key);
    tracing::info!(
        request_id = %request_id,
        proxy_condition = %key,
        proxy_url = %target,
        "Routing decision"
    );

    // 3. Forward and relay the response
    match forward::forward(&state.client, target, request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), target, start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                proxy_url = %target,
                error = %e,
                "Forwarding failed"
            );
            metrics::record_request(&method, e.status().as_u16(), target, start_time);
            e.into_response()
        }
    }
}
