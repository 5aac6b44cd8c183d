//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tokio::net::TcpListener;
use tower::ServiceExt;

use requires_https::{AppConfig, GuardConfig, HttpServer};

/// Config with the given guard policy and everything else defaulted.
#[allow(dead_code)]
pub fn config_with(guard: GuardConfig) -> AppConfig {
    AppConfig {
        guard,
        ..AppConfig::default()
    }
}

/// Drive one request through the full middleware stack without a socket.
#[allow(dead_code)]
pub async fn send(config: AppConfig, request: Request<Body>) -> Response<Body> {
    HttpServer::new(config)
        .router()
        .oneshot(request)
        .await
        .unwrap()
}

/// Plain `http` request as it arrives on the listener: origin-form URI plus Host.
#[allow(dead_code)]
pub fn http_request(host: &str, path_and_query: &str) -> Request<Body> {
    Request::builder()
        .uri(path_and_query)
        .header("Host", host)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Start a real server on an ephemeral port and return its address.
#[allow(dead_code)]
pub async fn start_server(config: AppConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
