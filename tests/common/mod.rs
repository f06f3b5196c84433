#![allow(dead_code)]

use axum::{
    Router, ServiceExt,
    extract::{ConnectInfo, Request},
    routing::IntoMakeService,
};
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;
use tower_http::normalize_path::NormalizePath;
use url_shortener::application::services::{LinkService, LinkSettings};
use url_shortener::domain::click_event::ClickEvent;
use url_shortener::domain::clock::ManualClock;
use url_shortener::infrastructure::persistence::InMemoryLinkRepository;
use url_shortener::routes::app_router;
use url_shortener::state::AppState;

pub const BASE_URL: &str = "http://sho.rt";
pub const PEER_ADDR: &str = "203.0.113.10:12345";

pub fn start_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub struct TestContext {
    pub state: AppState,
    pub clicks: mpsc::Receiver<ClickEvent>,
    pub clock: ManualClock,
}

impl TestContext {
    /// Records every queued click the way the worker does, without a location.
    pub async fn drain_clicks(&mut self) -> usize {
        let mut recorded = 0;
        while let Ok(event) = self.clicks.try_recv() {
            self.state
                .link_service
                .record_click(&event.code, event.clicked_at, event.referrer, None)
                .await
                .unwrap();
            recorded += 1;
        }
        recorded
    }
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(100, false)
}

pub fn create_test_context_with(queue_capacity: usize, behind_proxy: bool) -> TestContext {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let clock = ManualClock::new(start_time());

    let link_service = Arc::new(
        LinkService::new(
            Arc::new(InMemoryLinkRepository::new()),
            tx.clone(),
            LinkSettings {
                base_url: BASE_URL.to_string(),
                default_validity_minutes: 30,
            },
        )
        .with_clock(Arc::new(clock.clone())),
    );

    TestContext {
        state: AppState::new(link_service, tx, behind_proxy),
        clicks: rx,
        clock,
    }
}

pub type TestApp = IntoMakeService<MockConnectInfoService<NormalizePath<Router>>>;

/// The production router with any-origin CORS, plus a fixed peer address for
/// the redirect handler.
pub fn test_router(state: AppState) -> TestApp {
    test_router_with_origin(state, "*")
}

pub fn test_router_with_origin(state: AppState, cors_allow_origin: &str) -> TestApp {
    let app = MockConnectInfoLayer.layer(app_router(state, cors_allow_origin));
    ServiceExt::<Request>::into_make_service(app)
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
