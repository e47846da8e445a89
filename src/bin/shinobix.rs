// Native binary for Shinobix - Terminal UI mode

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::{self, OpenOptions},
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use shinobix::{
    api::{CatalogClient, CatalogSource},
    app::{App, InputMode},
    config::{load, Config},
    constants::{app::FRAME_MS, messages},
    controller::Session,
    fetch_worker::{run_fetch_worker, spawn_stats},
    prefs::PrefsStore,
    render::render_grid,
    types::{AppEvent, Endpoint, FetchRequest},
    ui,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    init_logging(&cfg);
    cfg.log_summary();

    let client = CatalogClient::new(cfg.api_url.clone(), cfg.timeout_ms)
        .context("Failed to build HTTP client")?;
    let source: Arc<dyn CatalogSource> = Arc::new(client);

    if cfg.print {
        return print_once(&cfg, source).await;
    }

    let prefs = PrefsStore::new(cfg.prefs_path.clone());
    let theme = cfg.theme_override.unwrap_or_else(|| prefs.load_theme());

    // app + channels
    let (event_tx, event_rx) = unbounded_channel::<AppEvent>();
    let (fetch_tx, fetch_rx) = unbounded_channel::<FetchRequest>();

    let worker = tokio::spawn(run_fetch_worker(source.clone(), fetch_rx, event_tx.clone()));
    // Detached: counters fill in whenever these land
    let stats_tasks = spawn_stats(source, event_tx);

    let mut app = App::new(
        Session::new(cfg.start_endpoint, &cfg.start_search),
        theme,
        Some(prefs),
        cfg.debounce_ms,
        Some(fetch_tx),
    );
    app.start();

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // main loop
    let result = run_loop(&mut app, &mut terminal, event_rx);

    // cleanup
    worker.abort();
    for task in stats_tasks {
        task.abort();
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Logs go to a file in TUI mode so they never draw over the alternate screen
fn init_logging(cfg: &Config) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if !cfg.print {
        if let Some(parent) = cfg.log_file.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(&cfg.log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                // No writable log file: stay quiet rather than corrupt the screen
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    let _ = builder.try_init();
}

/// `--print`: fetch the first page once, dump it as text, exit
async fn print_once(cfg: &Config, source: Arc<dyn CatalogSource>) -> Result<()> {
    let (session, req) = Session::new(cfg.start_endpoint, &cfg.start_search).start();
    let req = req.ok_or_else(|| anyhow!("no initial request"))?;

    let stats = futures::future::join_all(
        Endpoint::ALL.iter().map(|&e| {
            let source = source.clone();
            async move { (e, source.fetch_page(e, 1, "").await.ok().map(|p| p.total)) }
        }),
    );
    let page = source.fetch_page(req.endpoint, req.page, &req.search);
    let (stats, page) = futures::join!(stats, page);

    let line = stats
        .iter()
        .map(|(e, total)| match total {
            Some(n) if *n > 0 => format!("{}: {n}", e.title()),
            _ => format!("{}: {}", e.title(), messages::STAT_PENDING),
        })
        .collect::<Vec<_>>()
        .join(" · ");
    println!("{line}\n");

    match page {
        Ok(result) => {
            let session = session
                .loaded(req.seq, &result)
                .ok_or_else(|| anyhow!("response did not match request"))?;
            let grid = render_grid(&result.list, session.endpoint);
            print!("{}", ui::grid_text(&session.title(), &grid, &session.pagination()));
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}\n{}", messages::OFFLINE_HINT);
            Err(e.into())
        }
    }
}

fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let budget = Duration::from_millis(FRAME_MS);
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // input or fetch events
        if event::poll(budget)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }
        app.tick(Instant::now());

        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent) {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (k.code, k.modifiers) {
        app.request_quit();
        return;
    }

    // Handle search input mode separately
    if app.input_mode() == InputMode::Search {
        match k.code {
            KeyCode::Char(c) => app.search_add_char(c),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Enter => app.submit_search(),
            KeyCode::Esc => app.leave_search(),
            _ => {}
        }
        return;
    }

    // Detail overlay: close control, Escape, or scroll
    if app.input_mode() == InputMode::Detail {
        match k.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
            KeyCode::Up => app.up(),
            KeyCode::Down => app.down(),
            KeyCode::Home => app.home(),
            _ => {}
        }
        return;
    }

    // Normal mode keys
    match k.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('1') => app.set_endpoint(Endpoint::Character),
        KeyCode::Char('2') => app.set_endpoint(Endpoint::Clan),
        KeyCode::Char('3') => app.set_endpoint(Endpoint::Village),
        KeyCode::Tab => app.next_endpoint(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Up => app.up(),
        KeyCode::Down => app.down(),
        KeyCode::Home => app.home(),
        KeyCode::End => app.end(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Left | KeyCode::Char('[') => app.prev_page(),
        KeyCode::Right | KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}
