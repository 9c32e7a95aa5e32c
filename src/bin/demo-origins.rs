//! Three small origin servers for exercising the proxy by hand.
//!
//! Run alongside the proxy and point the condition URLs at them:
//!
//! ```text
//! A_CONDITION_URL=http://127.0.0.1:1331 \
//! B_CONDITION_URL=http://127.0.0.1:1332 \
//! DEFAULT_CONDITION_URL=http://127.0.0.1:1333 \
//! cargo run
//! ```

use std::net::SocketAddr;

use axum::Router;

async fn serve(port: u16, name: &'static str) {
    let app = Router::new().fallback(move || async move { format!("Listening on {port}: {name}") });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    println!("{name} origin listening on http://{addr}");

    axum::serve(listener, app).await.unwrap();
}

#[tokio::main]
async fn main() {
    tokio::join!(
        serve(1331, "foo"),
        serve(1332, "bar"),
        serve(1333, "baz"),
    );
}
