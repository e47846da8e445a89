//! Background fetch worker and stats tasks with an in-memory source

use async_trait::async_trait;
use serde_json::json;
use shinobix::error::{FetchError, FetchResult};
use shinobix::fetch_worker::{run_fetch_worker, spawn_stats};
use shinobix::{AppEvent, CatalogSource, Endpoint, FetchRequest, PageResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;

/// Clans are down; other collections serve `page * 10` as the total
struct FakeSource;

#[async_trait]
impl CatalogSource for FakeSource {
    async fn fetch_page(&self, endpoint: Endpoint, page: u32, _search: &str) -> FetchResult<PageResult> {
        if endpoint == Endpoint::Clan {
            return Err(FetchError::Http { status: 503, reason: "Service Unavailable".into() });
        }
        // Older pages answer later
        tokio::time::sleep(Duration::from_millis(u64::from(10 / page.max(1)) * 10)).await;
        Ok(PageResult {
            list: vec![json!({"name": format!("{endpoint} {page}")})],
            current_page: page,
            page_size: 20,
            total: u64::from(page) * 10,
        })
    }
}

fn request(seq: u64, endpoint: Endpoint, page: u32) -> FetchRequest {
    FetchRequest { seq, endpoint, page, search: String::new() }
}

#[tokio::test]
async fn worker_reports_each_request_by_seq() {
    let (fetch_tx, fetch_rx) = unbounded_channel();
    let (event_tx, mut event_rx) = unbounded_channel();
    let worker = tokio::spawn(run_fetch_worker(Arc::new(FakeSource), fetch_rx, event_tx));

    fetch_tx.send(request(1, Endpoint::Character, 1)).unwrap();
    fetch_tx.send(request(2, Endpoint::Character, 2)).unwrap();
    fetch_tx.send(request(3, Endpoint::Clan, 1)).unwrap();

    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for _ in 0..3 {
        match event_rx.recv().await.unwrap() {
            AppEvent::PageLoaded { seq, result } => loaded.push((seq, result.total)),
            AppEvent::PageFailed { seq, message } => failed.push((seq, message)),
            other => panic!("unexpected event {other:?}"),
        }
    }
    loaded.sort();
    assert_eq!(loaded, vec![(1, 10), (2, 20)]);
    assert_eq!(failed, vec![(3, "HTTP 503: Service Unavailable".to_string())]);

    drop(fetch_tx);
    worker.await.unwrap().unwrap();
}

#[tokio::test]
async fn slow_requests_do_not_block_newer_ones() {
    let (fetch_tx, fetch_rx) = unbounded_channel();
    let (event_tx, mut event_rx) = unbounded_channel();
    tokio::spawn(run_fetch_worker(Arc::new(FakeSource), fetch_rx, event_tx));

    fetch_tx.send(request(1, Endpoint::Village, 1)).unwrap();
    fetch_tx.send(request(2, Endpoint::Village, 10)).unwrap();

    match event_rx.recv().await.unwrap() {
        AppEvent::PageLoaded { seq, .. } => assert_eq!(seq, 2),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn stats_skip_failed_collections() {
    let (event_tx, mut event_rx) = unbounded_channel();
    let handles = spawn_stats(Arc::new(FakeSource), event_tx);
    for h in handles {
        h.await.unwrap();
    }

    let mut stats = Vec::new();
    while let Ok(ev) = event_rx.try_recv() {
        if let AppEvent::StatsLoaded { endpoint, total } = ev {
            stats.push((endpoint.to_string(), total));
        }
    }
    stats.sort();
    assert_eq!(stats, vec![("character".to_string(), 10), ("village".to_string(), 10)]);
}
