//! App-level flows: fetch sequencing, stale responses, search, detail, theme

use serde_json::{json, Value};
use shinobix::app::{App, InputMode, LoadState};
use shinobix::controller::Session;
use shinobix::prefs::PrefsStore;
use shinobix::theme::Theme;
use shinobix::{AppEvent, Endpoint, FetchRequest, PageResult};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

fn app_with_channel(endpoint: Endpoint) -> (App, UnboundedReceiver<FetchRequest>) {
    let (tx, rx) = unbounded_channel();
    let app = App::new(Session::new(endpoint, ""), Theme::Dark, None, 400, Some(tx));
    (app, rx)
}

fn characters(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Shinobi {i}"),
                "images": [format!("https://img.test/{i}.png")],
                "personal": {"affiliation": ["Konohagakure", "Team 7"]},
            })
        })
        .collect()
}

fn loaded(seq: u64, list: Vec<Value>, total: u64) -> AppEvent {
    AppEvent::PageLoaded {
        seq,
        result: PageResult { list, current_page: 1, page_size: 20, total },
    }
}

#[test]
fn start_issues_first_page_and_shows_skeleton() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Character);
    app.start();

    let req = rx.try_recv().unwrap();
    assert_eq!(req.seq, 1);
    assert_eq!(req.page, 1);
    assert_eq!(req.search, "");
    assert_eq!(app.load_state(), &LoadState::Loading);
}

#[test]
fn loaded_page_renders_cards_and_updates_stats() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Character);
    app.start();
    let req = rx.try_recv().unwrap();

    assert_eq!(app.stat_text(Endpoint::Character), "...");
    app.on_event(loaded(req.seq, characters(20), 45));

    assert_eq!(app.load_state(), &LoadState::Ready);
    assert_eq!(app.grid().cards().len(), 20);
    assert_eq!(app.grid().cards()[0].summary, "Village: Konohagakure");
    assert_eq!(app.pagination().label, "Page 1 of 3");
    assert_eq!(app.stat_text(Endpoint::Character), "45");
}

#[test]
fn stale_page_is_dropped_after_paginating() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Character);
    app.start();
    let first = rx.try_recv().unwrap();
    app.on_event(loaded(first.seq, characters(20), 45));

    app.next_page();
    let second = rx.try_recv().unwrap();
    assert_eq!(second.page, 2);
    assert_eq!(app.session().current_page, 2);

    // A late duplicate of the first response must not overwrite page 2's state
    app.on_event(loaded(first.seq, characters(3), 45));
    assert_eq!(app.load_state(), &LoadState::Loading);

    app.on_event(AppEvent::PageFailed { seq: first.seq, message: "boom".into() });
    assert_eq!(app.error_message(), None);

    app.on_event(AppEvent::PageFailed { seq: second.seq, message: "HTTP 500: Internal Server Error".into() });
    assert_eq!(app.error_message(), Some("HTTP 500: Internal Server Error"));
}

#[test]
fn pagination_past_the_edges_issues_nothing() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Clan);
    app.start();
    let req = rx.try_recv().unwrap();
    app.on_event(loaded(req.seq, vec![json!({"name": "Uchiha", "characters": [1, 2]})], 1));

    app.prev_page();
    app.next_page();
    assert!(rx.try_recv().is_err());
    assert!(!app.pagination().visible);
}

#[test]
fn typed_search_waits_for_idle_window() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Character);
    app.start();
    let _ = rx.try_recv().unwrap();

    app.start_search();
    assert_eq!(app.input_mode(), InputMode::Search);
    for c in "itachi".chars() {
        app.search_add_char(c);
    }

    app.tick(Instant::now());
    assert!(rx.try_recv().is_err(), "fired before the debounce window");

    app.tick(Instant::now() + Duration::from_millis(500));
    let req = rx.try_recv().unwrap();
    assert_eq!(req.search, "itachi");
    assert_eq!(req.page, 1);
    assert_eq!(app.title(), "Results for \"itachi\"");
}

#[test]
fn submit_bypasses_debounce_and_skips_unchanged_term() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Village);
    app.start();
    let _ = rx.try_recv().unwrap();

    app.start_search();
    for c in " kiri ".chars() {
        app.search_add_char(c);
    }
    app.submit_search();
    let req = rx.try_recv().unwrap();
    assert_eq!(req.search, "kiri");
    assert_eq!(app.input_mode(), InputMode::Normal);

    // Debounce was cancelled by the submit
    app.tick(Instant::now() + Duration::from_secs(5));
    assert!(rx.try_recv().is_err());

    // Same term on page 1: nothing to do
    app.start_search();
    app.submit_search();
    assert!(rx.try_recv().is_err());
}

#[test]
fn switching_collections_clears_the_search_box() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Character);
    app.start();
    let _ = rx.try_recv().unwrap();

    app.start_search();
    app.search_add_char('g');
    app.leave_search();
    app.set_endpoint(Endpoint::Village);

    assert_eq!(app.search_input(), "");
    let req = rx.try_recv().unwrap();
    assert_eq!(req.endpoint, Endpoint::Village);
    assert_eq!(req.search, "");

    // The abandoned keystroke never turns into a request
    app.tick(Instant::now() + Duration::from_secs(5));
    assert!(rx.try_recv().is_err());
}

#[test]
fn detail_overlay_opens_for_selection_and_closes_on_refetch() {
    let (mut app, mut rx) = app_with_channel(Endpoint::Character);
    app.start();
    let req = rx.try_recv().unwrap();
    app.on_event(loaded(req.seq, characters(2), 2));

    app.down();
    app.open_detail();
    assert_eq!(app.input_mode(), InputMode::Detail);
    assert_eq!(app.detail().map(|d| d.name.as_str()), Some("Shinobi 1"));

    app.reload();
    assert!(app.detail().is_none());
    assert_eq!(app.input_mode(), InputMode::Normal);
}

#[test]
fn zero_totals_keep_stats_pending() {
    let (mut app, _rx) = app_with_channel(Endpoint::Character);
    app.on_event(AppEvent::StatsLoaded { endpoint: Endpoint::Clan, total: 0 });
    assert_eq!(app.stat_text(Endpoint::Clan), "...");
    app.on_event(AppEvent::StatsLoaded { endpoint: Endpoint::Clan, total: 58 });
    assert_eq!(app.stat_text(Endpoint::Clan), "58");
}

#[test]
fn theme_toggle_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = PrefsStore::new(dir.path().join("nested").join("prefs.toml"));
    let mut app = App::new(Session::default(), Theme::Dark, Some(prefs.clone()), 400, None);

    app.toggle_theme();
    assert_eq!(app.theme(), Theme::Light);
    assert_eq!(prefs.load_theme(), Theme::Light);

    app.toggle_theme();
    assert_eq!(prefs.load_theme(), Theme::Dark);
}

#[test]
fn quit_sets_flag() {
    let (mut app, _rx) = app_with_channel(Endpoint::Character);
    assert!(!app.quit_flag());
    app.request_quit();
    assert!(app.quit_flag());
}
