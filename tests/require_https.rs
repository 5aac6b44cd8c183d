//! Guard behaviour through the full router stack.

use axum::body::Body;
use axum::http::header::LOCATION;
use axum::http::{Request, StatusCode};

use requires_https::{AppConfig, GuardConfig};

mod common;

#[tokio::test]
async fn test_absolute_https_target_is_still_insecure() {
    let request = Request::builder()
        .uri("https://example.com/a?b=1")
        .body(Body::empty())
        .unwrap();

    let response = common::send(AppConfig::default(), request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "https://example.com/a?b=1");
}

#[tokio::test]
async fn test_absolute_https_target_rejected_when_forced() {
    let config = common::config_with(GuardConfig {
        force_401: true,
        ..GuardConfig::default()
    });
    let request = Request::builder()
        .uri("https://example.com/admin")
        .header("Host", "example.com")
        .body(Body::empty())
        .unwrap();

    let response = common::send(config, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::body_string(response).await, "");
}

#[tokio::test]
async fn test_trusted_https_request_reaches_handler() {
    let mut config = AppConfig::default();
    config.listener.trust_forwarded_proto = true;
    let request = Request::builder()
        .uri("/a?b=1")
        .header("Host", "example.com")
        .header("X-Forwarded-Proto", "https")
        .body(Body::empty())
        .unwrap();

    let response = common::send(config, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(LOCATION).is_none());
    assert_eq!(common::body_string(response).await, "GET /a?b=1");
}

#[tokio::test]
async fn test_http_request_redirected_to_https() {
    let response = common::send(
        AppConfig::default(),
        common::http_request("localhost", "/orders/7?awesome=yes&cool=definitely"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[LOCATION],
        "https://localhost/orders/7?awesome=yes&cool=definitely"
    );
    assert!(response.headers().get("host").is_none());
}

#[tokio::test]
async fn test_redirect_replaces_listener_port() {
    let config = common::config_with(GuardConfig {
        https_port_number: 2014,
        ..GuardConfig::default()
    });

    let response = common::send(config, common::http_request("localhost:8080", "/")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "https://localhost:2014/");
}

#[tokio::test]
async fn test_fixed_target_overrides_force_401() {
    let config = common::config_with(GuardConfig {
        force_401: true,
        redirect_to_https_path: Some("http://www.google.co.uk".into()),
        ..GuardConfig::default()
    });

    let response = common::send(config, common::http_request("localhost", "/login")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "http://www.google.co.uk");
}

#[tokio::test]
async fn test_force_401_with_blank_target() {
    let config = common::config_with(GuardConfig {
        force_401: true,
        redirect_to_https_path: Some("  ".into()),
        ..GuardConfig::default()
    });

    let response = common::send(config, common::http_request("localhost", "/")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_missing_host_is_bad_request() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = common::send(AppConfig::default(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_forwarded_proto_needs_trust() {
    let forwarded = || {
        Request::builder()
            .uri("/status")
            .header("Host", "example.com")
            .header("X-Forwarded-Proto", "https")
            .body(Body::empty())
            .unwrap()
    };

    let untrusted = common::send(AppConfig::default(), forwarded()).await;
    assert_eq!(untrusted.status(), StatusCode::FOUND);
    assert_eq!(untrusted.headers()[LOCATION], "https://example.com/status");

    let mut config = AppConfig::default();
    config.listener.trust_forwarded_proto = true;
    let trusted = common::send(config, forwarded()).await;
    assert_eq!(trusted.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unencodable_fixed_target_is_server_error() {
    let config = common::config_with(GuardConfig {
        redirect_to_https_path: Some("https://bad\u{7f}target".into()),
        ..GuardConfig::default()
    });

    let response = common::send(config, common::http_request("localhost", "/")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
