//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, database connections, worker spawning, and Axum server lifecycle.

use crate::application::services::{LinkService, LinkSettings};
use crate::config::{Config, StorageBackend};
use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::location::{
    ExternalApiLocationResolver, LocationResolver, NullLocationResolver,
};
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::ShortcodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Location resolver (external GeoIP API or none)
/// - Background click worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    let resolver: Arc<dyn LocationResolver> = match &config.geoip_api_url {
        Some(template) => {
            tracing::info!("Location lookup enabled (external API)");
            Arc::new(ExternalApiLocationResolver::new(template))
        }
        None => {
            tracing::info!("Location lookup disabled");
            Arc::new(NullLocationResolver::new())
        }
    };

    let settings = LinkSettings {
        base_url: config.base_url.clone(),
        default_validity_minutes: config.default_validity_minutes,
    };
    let generator = ShortcodeGenerator::new(config.code_length);

    let pipeline = start_click_pipeline(
        |click_tx| LinkService::new(repository, click_tx, settings).with_generator(generator),
        resolver,
        config.click_queue_capacity,
        config.click_worker_concurrency,
    );

    let state = AppState::new(pipeline.link_service, pipeline.click_sender, config.behind_proxy);

    let app = app_router(state, &config.cors_allow_origin);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router, and every sender it held, is gone once serve returns.
    tracing::info!("Server stopped, draining click queue");
    if let Err(e) = pipeline.worker.await {
        tracing::error!("Click worker failed: {e}");
    }

    Ok(())
}

/// A link service wired to the background worker that records its clicks.
pub struct ClickPipeline {
    pub link_service: Arc<LinkService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Completes once every sender is dropped and queued clicks are recorded.
    pub worker: JoinHandle<()>,
}

/// Creates the click queue, builds the link service on it and spawns the worker.
///
/// The worker only gets a [`crate::application::services::ClickRecorder`], so
/// the returned service and sender are the only things keeping the queue open.
pub fn start_click_pipeline(
    build_service: impl FnOnce(mpsc::Sender<ClickEvent>) -> LinkService,
    resolver: Arc<dyn LocationResolver>,
    queue_capacity: usize,
    worker_concurrency: usize,
) -> ClickPipeline {
    let (click_tx, click_rx) = mpsc::channel(queue_capacity);
    let link_service = Arc::new(build_service(click_tx.clone()));

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        link_service.click_recorder(),
        resolver,
        worker_concurrency,
    ));

    ClickPipeline {
        link_service,
        click_sender: click_tx,
        worker,
    }
}

async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, links are lost on restart");
            Ok(Arc::new(InMemoryLinkRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
    }
}

/// Opens a PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if no database URL is configured or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config.require_database_url()?;

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received");
}
