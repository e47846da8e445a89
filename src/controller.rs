//! Page controller: session state and its transitions.
//!
//! Every user action maps to a pure [`transition`] that returns the next
//! [`Session`] and, when data must be (re)loaded, the [`FetchRequest`] to
//! issue. Responses are matched back by sequence number so a slow reply to
//! an old request can never overwrite a newer page.

use crate::constants::api::ITEMS_PER_PAGE;
use crate::types::{Endpoint, FetchRequest, PageResult};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub current_page: u32,
    pub total_pages: u32,
    pub endpoint: Endpoint,
    /// Empty means no filter
    pub search: String,
    pub items_per_page: u32,
    /// Sequence number of the newest issued fetch (0 = none yet)
    pub latest_seq: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Endpoint::Character, "")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Navigate(Endpoint),
    Paginate(i32),
    /// Debounced typing
    Search(String),
    /// Explicit submit (Enter)
    Submit(String),
    Reload,
}

/// What the pagination footer should show
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationView {
    pub visible: bool,
    pub label: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// `max(1, ceil(total / per_page))`
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total.div_ceil(per_page as u64);
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

impl Session {
    pub fn new(endpoint: Endpoint, search: &str) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            endpoint,
            search: search.trim().to_string(),
            items_per_page: ITEMS_PER_PAGE,
            latest_seq: 0,
        }
    }

    /// Request for the session's current coordinates under a fresh sequence number
    fn issue(mut self) -> (Session, Option<FetchRequest>) {
        self.latest_seq += 1;
        let req = FetchRequest {
            seq: self.latest_seq,
            endpoint: self.endpoint,
            page: self.current_page,
            search: self.search.clone(),
        };
        (self, Some(req))
    }

    /// Initial load at startup
    pub fn start(&self) -> (Session, Option<FetchRequest>) {
        self.clone().issue()
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    pub fn title(&self) -> String {
        if self.search.is_empty() {
            self.endpoint.title().to_string()
        } else {
            format!("Results for \"{}\"", self.search)
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn pagination(&self) -> PaginationView {
        PaginationView {
            visible: self.total_pages > 1,
            label: format!("Page {} of {}", self.current_page, self.total_pages),
            prev_disabled: !self.can_go_prev(),
            next_disabled: !self.can_go_next(),
        }
    }

    /// Apply a successful response for `seq`; `None` when it is stale.
    pub fn loaded(&self, seq: u64, result: &PageResult) -> Option<Session> {
        if !self.is_latest(seq) {
            return None;
        }
        let mut next = self.clone();
        next.total_pages = total_pages(result.total, self.items_per_page);
        Some(next)
    }

    /// Unfiltered first pages double as the collection size for the stats counters
    pub fn stats_update(&self, result: &PageResult) -> Option<(Endpoint, u64)> {
        (self.search.is_empty() && self.current_page == 1).then_some((self.endpoint, result.total))
    }
}

/// Pure state transition. Returns the next session and the fetch to issue, if any.
pub fn transition(session: &Session, action: Action) -> (Session, Option<FetchRequest>) {
    let mut next = session.clone();
    match action {
        Action::Navigate(endpoint) => {
            if endpoint != session.endpoint {
                next.search.clear();
            }
            next.endpoint = endpoint;
            next.current_page = 1;
            next.issue()
        }
        Action::Paginate(delta) => {
            let target = i64::from(session.current_page) + i64::from(delta);
            if target < 1 || target > i64::from(session.total_pages) || delta == 0 {
                return (next, None);
            }
            next.current_page = target as u32;
            next.issue()
        }
        Action::Search(term) => {
            let term = term.trim();
            if term == session.search {
                return (next, None);
            }
            next.search = term.to_string();
            next.current_page = 1;
            next.issue()
        }
        Action::Submit(term) => {
            let term = term.trim();
            if term == session.search && session.current_page == 1 {
                return (next, None);
            }
            next.search = term.to_string();
            next.current_page = 1;
            next.issue()
        }
        Action::Reload => next.issue(),
    }
}

/// Holds typed search text until input has been idle for `delay`
#[derive(Clone, Debug)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record an edit; restarts the idle window
    pub fn edit(&mut self, text: &str, now: Instant) {
        self.pending = Some((text.to_string(), now));
    }

    /// The buffered text once the idle window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(total: u64) -> PageResult {
        PageResult {
            list: vec![json!({"name": "x"})],
            current_page: 1,
            page_size: 20,
            total,
        }
    }

    #[test]
    fn total_pages_rounds_up_with_floor_of_one() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 20), 3);
    }

    #[test]
    fn navigate_to_other_endpoint_clears_search() {
        let s = Session::new(Endpoint::Character, "naruto");
        let (next, req) = transition(&s, Action::Navigate(Endpoint::Clan));
        assert_eq!(next.search, "");
        assert_eq!(next.current_page, 1);
        let req = req.unwrap();
        assert_eq!(req.endpoint, Endpoint::Clan);
        assert_eq!(req.seq, 1);
    }

    #[test]
    fn navigate_to_same_endpoint_keeps_search() {
        let mut s = Session::new(Endpoint::Village, "kiri");
        s.current_page = 2;
        s.total_pages = 3;
        let (next, req) = transition(&s, Action::Navigate(Endpoint::Village));
        assert_eq!(next.search, "kiri");
        assert_eq!(next.current_page, 1);
        assert!(req.is_some());
    }

    #[test]
    fn pagination_stays_within_bounds() {
        let s = Session::default();
        let (_, req) = transition(&s, Action::Paginate(-1));
        assert!(req.is_none());
        let (_, req) = transition(&s, Action::Paginate(1));
        assert!(req.is_none(), "single page cannot advance");
    }

    #[test]
    fn end_to_end_forty_five_characters() {
        let (s, req) = Session::default().start();
        let req = req.unwrap();
        let s = s.loaded(req.seq, &page(45)).unwrap();
        assert_eq!(s.total_pages, 3);
        let view = s.pagination();
        assert!(view.visible);
        assert!(view.prev_disabled);
        assert!(!view.next_disabled);

        let (s, req) = transition(&s, Action::Paginate(1));
        let s = s.loaded(req.unwrap().seq, &page(45)).unwrap();
        let (s, req) = transition(&s, Action::Paginate(1));
        let s = s.loaded(req.unwrap().seq, &page(45)).unwrap();
        assert_eq!(s.current_page, 3);
        assert!(s.pagination().next_disabled);

        let (after, req) = transition(&s, Action::Paginate(1));
        assert!(req.is_none());
        assert_eq!(after, s);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut s = Session::default();
        s.total_pages = 5;
        let (s, first) = transition(&s, Action::Paginate(1));
        let (s, second) = transition(&s, Action::Paginate(1));
        let (first, second) = (first.unwrap(), second.unwrap());
        assert!(second.seq > first.seq);
        assert!(s.loaded(first.seq, &page(200)).is_none());
        assert_eq!(s.loaded(second.seq, &page(200)).unwrap().total_pages, 10);
    }

    #[test]
    fn debounced_search_only_fires_on_change() {
        let s = Session::new(Endpoint::Character, "itachi");
        let (_, req) = transition(&s, Action::Search("  itachi ".into()));
        assert!(req.is_none());
        let (next, req) = transition(&s, Action::Search("sasuke".into()));
        assert_eq!(next.search, "sasuke");
        assert_eq!(req.unwrap().search, "sasuke");
        assert_eq!(next.title(), "Results for \"sasuke\"");
    }

    #[test]
    fn submit_refetches_when_off_first_page() {
        let mut s = Session::new(Endpoint::Character, "lee");
        s.total_pages = 4;
        s.current_page = 3;
        let (next, req) = transition(&s, Action::Submit("lee".into()));
        assert_eq!(next.current_page, 1);
        assert_eq!(req.unwrap().page, 1);

        let (_, req) = transition(&next, Action::Submit("lee".into()));
        assert!(req.is_none());
    }

    #[test]
    fn stats_only_from_unfiltered_first_page() {
        let s = Session::new(Endpoint::Clan, "");
        assert_eq!(s.stats_update(&page(58)), Some((Endpoint::Clan, 58)));
        let s = Session::new(Endpoint::Clan, "uchiha");
        assert_eq!(s.stats_update(&page(1)), None);
    }

    #[test]
    fn debounce_waits_for_idle_window() {
        let mut d = SearchDebounce::new(Duration::from_millis(400));
        let t0 = Instant::now();
        d.edit("na", t0);
        d.edit("nar", t0 + Duration::from_millis(300));
        assert_eq!(d.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(700)), Some("nar".to_string()));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + Duration::from_millis(900)), None);
    }
}
