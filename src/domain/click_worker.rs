//! Background processing of queued clicks.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::services::ClickRecorder;
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::location::LocationResolver;

/// Drains the click queue until every sender is dropped.
///
/// Each event gets its location resolved and is appended through
/// [`ClickRecorder::record_click`]. At most `concurrency` events are in flight
/// at once. Failed appends are logged and counted, never retried. Events
/// already queued are finished before the worker returns.
///
/// The recorder holds no sender, so the queue closes once the HTTP side drops
/// its senders.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: ClickRecorder,
    resolver: Arc<dyn LocationResolver>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    info!(
        concurrency,
        resolver = resolver.name(),
        "Click worker started"
    );

    while let Some(event) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };

        let recorder = recorder.clone();
        let resolver = Arc::clone(&resolver);
        tasks.spawn(async move {
            process_click(event, &recorder, resolver.as_ref()).await;
            drop(permit);
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("Click queue closed, worker stopped");
}

async fn process_click(
    event: ClickEvent,
    recorder: &ClickRecorder,
    resolver: &dyn LocationResolver,
) {
    let location = match event.client_ip {
        Some(ip) => resolver.resolve(ip).await,
        None => None,
    };

    match recorder
        .record_click(&event.code, event.clicked_at, event.referrer, location)
        .await
    {
        Ok(()) => {
            counter!("clicks_recorded_total").increment(1);
            debug!(code = %event.code, "Click recorded");
        }
        Err(e) => {
            counter!("clicks_failed_total").increment(1);
            warn!(code = %event.code, error = %e, "Failed to record click");
        }
    }
}
