use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::constants::{app::TOAST_DURATION_SECS, messages};
use crate::controller::{transition, Action, PaginationView, SearchDebounce, Session};
use crate::prefs::PrefsStore;
use crate::render::{render_detail, render_grid, Card, DetailView, GridView};
use crate::theme::{ColorScheme, Theme};
use crate::types::{AppEvent, Endpoint, FetchRequest};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode { Normal, Search, Detail }

/// Grid area state for the current page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Skeleton cards while the page fetch is in flight
    Loading,
    Ready,
    /// Error panel shown; the grid stays in skeleton state
    Failed(String),
}

pub struct App {
    quit: bool,
    session: Session,

    // Current page: raw entities plus their card views
    items: Vec<Value>,
    grid: GridView,
    selected: usize,
    load: LoadState,

    // Detail overlay
    detail: Option<DetailView>,
    detail_scroll: u16,

    input_mode: InputMode,
    search_input: String,
    debounce: SearchDebounce,

    stats: HashMap<Endpoint, u64>,

    theme: Theme,
    prefs: Option<PrefsStore>,

    fetch_tx: Option<UnboundedSender<FetchRequest>>,

    toast_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(
        session: Session,
        theme: Theme,
        prefs: Option<PrefsStore>,
        debounce_ms: u64,
        fetch_tx: Option<UnboundedSender<FetchRequest>>,
    ) -> Self {
        let search_input = session.search.clone();
        Self {
            quit: false,
            session,
            items: Vec::new(),
            grid: GridView::Empty,
            selected: 0,
            load: LoadState::Loading,
            detail: None,
            detail_scroll: 0,
            input_mode: InputMode::Normal,
            search_input,
            debounce: SearchDebounce::new(Duration::from_millis(debounce_ms)),
            stats: HashMap::new(),
            theme,
            prefs,
            fetch_tx,
            toast_message: None,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn session(&self) -> &Session { &self.session }
    pub fn endpoint(&self) -> Endpoint { self.session.endpoint }
    pub fn grid(&self) -> &GridView { &self.grid }
    pub fn items(&self) -> &[Value] { &self.items }
    pub fn selected(&self) -> usize { self.selected }
    pub fn load_state(&self) -> &LoadState { &self.load }
    pub fn detail(&self) -> Option<&DetailView> { self.detail.as_ref() }
    pub fn detail_scroll(&self) -> u16 { self.detail_scroll }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn search_input(&self) -> &str { &self.search_input }
    pub fn theme(&self) -> Theme { self.theme }
    pub fn colors(&self) -> ColorScheme { self.theme.colors() }
    pub fn title(&self) -> String { self.session.title() }
    pub fn pagination(&self) -> PaginationView { self.session.pagination() }

    pub fn error_message(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Counter text for the header; `...` until a positive total arrives
    pub fn stat_text(&self, endpoint: Endpoint) -> String {
        match self.stats.get(&endpoint) {
            Some(n) if *n > 0 => n.to_string(),
            _ => messages::STAT_PENDING.to_string(),
        }
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.grid.cards().get(self.selected)
    }

    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn toast_message(&self) -> Option<&str> {
        match &self.toast_message {
            Some((msg, at)) if at.elapsed() < Duration::from_secs(TOAST_DURATION_SECS) => {
                Some(msg.as_str())
            }
            _ => None,
        }
    }

    // ----- controller plumbing -----

    /// Issue the initial page load
    pub fn start(&mut self) {
        let (next, req) = self.session.start();
        self.session = next;
        if let Some(req) = req {
            self.begin_fetch(req);
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let endpoint_changed =
            matches!(action, Action::Navigate(e) if e != self.session.endpoint);
        let (next, req) = transition(&self.session, action);
        self.session = next;
        if endpoint_changed {
            // Switching collections clears the search box
            self.search_input.clear();
            self.debounce.cancel();
        }
        if let Some(req) = req {
            self.begin_fetch(req);
        }
    }

    fn begin_fetch(&mut self, req: FetchRequest) {
        self.load = LoadState::Loading;
        self.detail = None;
        if self.input_mode == InputMode::Detail {
            self.input_mode = InputMode::Normal;
        }
        match &self.fetch_tx {
            Some(tx) => {
                if tx.send(req).is_err() {
                    log::error!("[app] fetch worker is gone");
                    self.load = LoadState::Failed("Fetch worker stopped".to_string());
                }
            }
            None => log::debug!("[app] no fetch worker; dropping request #{}", req.seq),
        }
    }

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::PageLoaded { seq, result } => {
                let Some(next) = self.session.loaded(seq, &result) else {
                    log::debug!("[app] dropping stale page #{seq} (latest #{})", self.session.latest_seq);
                    return;
                };
                self.session = next;
                if let Some((endpoint, total)) = self.session.stats_update(&result) {
                    self.stats.insert(endpoint, total);
                }
                self.grid = render_grid(&result.list, self.session.endpoint);
                self.items = result.list;
                self.selected = 0;
                self.load = LoadState::Ready;
            }
            AppEvent::PageFailed { seq, message } => {
                if !self.session.is_latest(seq) {
                    log::debug!("[app] dropping stale failure #{seq}");
                    return;
                }
                log::warn!("[app] page load failed: {message}");
                self.load = LoadState::Failed(message);
            }
            AppEvent::StatsLoaded { endpoint, total } => {
                if total > 0 {
                    self.stats.insert(endpoint, total);
                }
            }
            AppEvent::Quit => self.quit = true,
        }
    }

    /// Called every frame; applies debounced search text once typing pauses
    pub fn tick(&mut self, now: Instant) {
        if let Some(term) = self.debounce.poll(now) {
            self.dispatch(Action::Search(term));
        }
    }

    // ----- navigation -----

    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        self.dispatch(Action::Navigate(endpoint));
    }

    pub fn next_endpoint(&mut self) {
        self.set_endpoint(self.session.endpoint.next());
    }

    pub fn prev_page(&mut self) {
        if self.session.can_go_prev() {
            self.dispatch(Action::Paginate(-1));
        }
    }

    pub fn next_page(&mut self) {
        if self.session.can_go_next() {
            self.dispatch(Action::Paginate(1));
        }
    }

    pub fn reload(&mut self) {
        self.dispatch(Action::Reload);
    }

    pub fn up(&mut self) {
        match self.input_mode {
            InputMode::Detail => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            _ => self.selected = self.selected.saturating_sub(1),
        }
    }

    pub fn down(&mut self) {
        match self.input_mode {
            InputMode::Detail => self.detail_scroll = self.detail_scroll.saturating_add(1),
            _ => {
                if self.selected + 1 < self.grid.cards().len() {
                    self.selected += 1;
                }
            }
        }
    }

    pub fn home(&mut self) {
        match self.input_mode {
            InputMode::Detail => self.detail_scroll = 0,
            _ => self.selected = 0,
        }
    }

    pub fn end(&mut self) {
        if self.input_mode != InputMode::Detail {
            self.selected = self.grid.cards().len().saturating_sub(1);
        }
    }

    // ----- detail overlay -----

    /// Open the detail overlay for the selected card's raw entity
    pub fn open_detail(&mut self) {
        let Some(index) = self.selected_card().map(|c| c.index) else {
            return;
        };
        if let Some(entity) = self.items.get(index) {
            self.detail = Some(render_detail(entity, self.session.endpoint));
            self.detail_scroll = 0;
            self.input_mode = InputMode::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_scroll = 0;
        if self.input_mode == InputMode::Detail {
            self.input_mode = InputMode::Normal;
        }
    }

    // ----- search -----

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_add_char(&mut self, c: char) {
        self.search_input.push(c);
        self.debounce.edit(&self.search_input, Instant::now());
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
        self.debounce.edit(&self.search_input, Instant::now());
    }

    /// Enter: apply immediately, bypassing the debounce
    pub fn submit_search(&mut self) {
        self.debounce.cancel();
        self.input_mode = InputMode::Normal;
        let term = self.search_input.trim().to_string();
        self.dispatch(Action::Submit(term));
    }

    /// Esc: leave the search box; pending debounced text still applies
    pub fn leave_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    // ----- theme -----

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Some(prefs) = &self.prefs {
            if let Err(e) = prefs.save_theme(self.theme) {
                log::warn!("[app] {e:#}");
                self.show_toast("Could not save theme".to_string());
            }
        }
    }

    pub fn request_quit(&mut self) {
        self.on_event(AppEvent::Quit);
    }
}
