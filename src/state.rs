//! Shared application state injected into handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{LinkService, StatsService};
use crate::domain::click_event::ClickEvent;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    /// Sender side of the click queue, used for health reporting.
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Builds the state around a link service; the stats service shares it.
    pub fn new(
        link_service: Arc<LinkService>,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        let stats_service = Arc::new(StatsService::new(Arc::clone(&link_service)));

        Self {
            link_service,
            stats_service,
            click_sender,
            behind_proxy,
        }
    }
}
