use crate::{
    api::CatalogSource,
    types::{AppEvent, Endpoint, FetchRequest},
};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Background task that executes page fetches issued by the controller.
///
/// Each request runs in its own task so a slow page never blocks the next
/// one; superseded requests are left to finish and the controller drops
/// their results by sequence number.
pub async fn run_fetch_worker(
    source: Arc<dyn CatalogSource>,
    mut fetch_rx: UnboundedReceiver<FetchRequest>,
    event_tx: UnboundedSender<AppEvent>,
) -> Result<()> {
    log::info!("[fetch] worker started");

    while let Some(req) = fetch_rx.recv().await {
        log::debug!(
            "[fetch] #{} {} page={} search={:?}",
            req.seq,
            req.endpoint,
            req.page,
            req.search
        );
        let source = source.clone();
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let ev = match source.fetch_page(req.endpoint, req.page, &req.search).await {
                Ok(result) => AppEvent::PageLoaded { seq: req.seq, result },
                Err(e) => {
                    log::warn!("[fetch] #{} {} page {} failed: {e}", req.seq, req.endpoint, req.page);
                    AppEvent::PageFailed { seq: req.seq, message: e.to_string() }
                }
            };
            // Receiver gone means the UI is shutting down
            let _ = tx.send(ev);
        });
    }

    log::info!("[fetch] worker shutting down");
    Ok(())
}

/// Fire one detached first-page fetch per collection to fill the stats counters.
///
/// Best effort: failures are logged at debug level and dropped, and nothing
/// waits on these tasks.
pub fn spawn_stats(
    source: Arc<dyn CatalogSource>,
    event_tx: UnboundedSender<AppEvent>,
) -> Vec<JoinHandle<()>> {
    Endpoint::ALL
        .iter()
        .map(|&endpoint| {
            let source = source.clone();
            let tx = event_tx.clone();
            tokio::spawn(async move {
                match source.fetch_page(endpoint, 1, "").await {
                    Ok(result) => {
                        let _ = tx.send(AppEvent::StatsLoaded { endpoint, total: result.total });
                    }
                    Err(e) => log::debug!("[stats] {endpoint} unavailable: {e}"),
                }
            })
        })
        .collect()
}
