mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use serde_json::json;
use std::net::IpAddr;

async fn create(server: &TestServer, body: serde_json::Value) -> String {
    let response = server.post("/shorturls").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<serde_json::Value>()["shortcode"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_redirect_success() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state.clone())).unwrap();

    let code = create(&server, json!({ "url": "https://example.com/target" })).await;

    let response = server.get(&format!("/{code}")).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state.clone())).unwrap();

    let response = server.get("/notfound").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "not_found");
    assert_eq!(json["details"]["shortcode"], "notfound");
}

#[tokio::test]
async fn test_redirect_expired() {
    let mut ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state.clone())).unwrap();

    let code = create(&server, json!({ "url": "https://example.com", "validity": 1 })).await;

    ctx.clock.advance(Duration::seconds(61));

    let response = server.get(&format!("/{code}")).await;

    response.assert_status(StatusCode::GONE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "expired");
    assert_eq!(ctx.drain_clicks().await, 0);
}

#[tokio::test]
async fn test_redirect_queues_click_with_referrer_and_peer_ip() {
    let mut ctx = common::create_test_context();
    let server = TestServer::new(common::test_router(ctx.state.clone())).unwrap();

    let code = create(&server, json!({ "url": "https://example.com" })).await;

    server
        .get(&format!("/{code}"))
        .add_header("Referer", "https://news.ycombinator.com/item?id=1")
        .add_header("X-Forwarded-For", "198.51.100.77")
        .await
        .assert_status(StatusCode::FOUND);

    let event = ctx.clicks.try_recv().unwrap();
    assert_eq!(event.code, code);
    assert_eq!(
        event.referrer.as_deref(),
        Some("https://news.ycombinator.com/item?id=1")
    );
    // Proxy headers are ignored unless BEHIND_PROXY is set.
    assert_eq!(event.client_ip, Some("203.0.113.10".parse::<IpAddr>().unwrap()));
}

#[tokio::test]
async fn test_redirect_behind_proxy_uses_forwarded_for() {
    let mut ctx = common::create_test_context_with(100, true);
    let server = TestServer::new(common::test_router(ctx.state.clone())).unwrap();

    let code = create(&server, json!({ "url": "https://example.com" })).await;

    server
        .get(&format!("/{code}"))
        .add_header("X-Forwarded-For", "198.51.100.77, 10.0.0.1")
        .await
        .assert_status(StatusCode::FOUND);

    let event = ctx.clicks.try_recv().unwrap();
    assert_eq!(event.client_ip, Some("198.51.100.77".parse::<IpAddr>().unwrap()));
    assert!(event.referrer.is_none());
}

#[tokio::test]
async fn test_redirect_with_full_queue_still_redirects() {
    let mut ctx = common::create_test_context_with(1, false);
    let server = TestServer::new(common::test_router(ctx.state.clone())).unwrap();

    let code = create(&server, json!({ "url": "https://example.com" })).await;

    for _ in 0..3 {
        server
            .get(&format!("/{code}"))
            .await
            .assert_status(StatusCode::FOUND);
    }

    for _ in 0..3 {
        let event = ctx.clicks.recv().await.unwrap();
        assert_eq!(event.code, code);
    }
}
