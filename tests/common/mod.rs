//! Shared utilities for integration testing.

use ingest_sink::config::loader::finalize_routes;
use ingest_sink::config::RouteMap;
use ingest_sink::http::HttpServer;
use ingest_sink::lifecycle::Shutdown;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Validate `routes`, bind an ephemeral port, and serve in the
/// background. Returns the bound address and the shutdown coordinator;
/// triggering it drains the server and flushes append handles.
pub async fn spawn_sink(mut routes: RouteMap) -> (SocketAddr, Shutdown) {
    finalize_routes(&mut routes).expect("test route map must validate");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = shutdown.handle();
    let server = HttpServer::new(routes);
    tokio::spawn(async move {
        let _ = server.run(listener, handle).await;
    });

    (addr, shutdown)
}

/// Non-pooled client so each test request opens a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
