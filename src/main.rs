mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::clock::ClockFlags;
use crate::state::events::{ChangedResource, EventChannel, PushEvent};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use courtside_api::client::TournamentApi;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let tournament =
        std::env::var("COURTSIDE_TOURNAMENT").unwrap_or_else(|_| "demo".to_string());
    let events_url = std::env::var("COURTSIDE_EVENTS_WS")
        .unwrap_or_else(|_| "ws://127.0.0.1:8088/events".to_string());

    let app = Arc::new(Mutex::new(App::new()));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (push_event_tx, push_event_rx) = mpsc::channel::<PushEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread — the API client is built here and handed in
    let api = TournamentApi::new(tournament.clone());
    let network_worker = NetworkWorker::new(api, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Push-event channel — constructed and owned by this composition root
    let event_channel = EventChannel::new(events_url, tournament, push_event_tx);
    let events_task = tokio::spawn(event_channel.run());

    // Periodic refresh thread (scoreboard every 10s, fan views every 60s)
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone());
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger the initial loads on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        ui_event_tx,
        network_req_tx,
        network_resp_rx,
        push_event_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    events_task.abort();
    periodic_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("courtside {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "courtside - tournament display board & fan dashboard

Usage:
  courtside
  courtside --help
  courtside --version

Environment:
  COURTSIDE_API              Backend REST base URL (default http://127.0.0.1:8088/api)
  COURTSIDE_EVENTS_WS        Push-event WebSocket URL (default ws://127.0.0.1:8088/events)
  COURTSIDE_TOURNAMENT       Tournament slug to follow (default demo)
  COURTSIDE_SCOREBOARD_JSON  Path to a local scoreboard snapshot for offline dry runs"
}

/// One-second tick schedule for the match clock. Alive only while the clock
/// is running or on break; torn down and restarted whenever the flag
/// snapshot changes so a state transition also resets the tick phase.
struct ClockTicker {
    flags: ClockFlags,
    handle: Option<JoinHandle<()>>,
}

impl ClockTicker {
    fn new() -> Self {
        Self { flags: ClockFlags::default(), handle: None }
    }

    fn sync(&mut self, flags: ClockFlags, ui_events: &mpsc::Sender<UiEvent>) {
        if flags == self.flags {
            return;
        }
        self.flags = flags;

        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        if flags.is_live() {
            let tx = ui_events.clone();
            self.handle = Some(tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                // The first tick completes immediately; skip it so the clock
                // moves one full second after the resync that started us.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if tx.send(UiEvent::ClockTick).await.is_err() {
                        break;
                    }
                }
            }));
        }
    }
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    ui_event_tx: mpsc::Sender<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut push_events: mpsc::Receiver<PushEvent>,
) {
    let mut loading = LoadingState::default();
    let mut ticker = ClockTicker::new();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                sync_ticker(&mut ticker, &app, &ui_event_tx).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                sync_ticker(&mut ticker, &app, &ui_event_tx).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(push_event) = push_events.recv() => {
                let should_redraw = handle_push_event(push_event, &app, &network_requests).await;
                sync_ticker(&mut ticker, &app, &ui_event_tx).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

/// Re-key the tick schedule on the clock's current flag snapshot. Cheap when
/// nothing changed; handlers above may have just resynced the clock.
async fn sync_ticker(
    ticker: &mut ClockTicker,
    app: &Arc<Mutex<App>>,
    ui_events: &mpsc::Sender<UiEvent>,
) {
    let flags = app.lock().await.clock_flags();
    ticker.sync(flags, ui_events);
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            for request in [
                NetworkRequest::RefreshScoreboard,
                NetworkRequest::RefreshStandings,
                NetworkRequest::RefreshBracket,
                NetworkRequest::RefreshSummary,
            ] {
                let _ = network_requests.send(request).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::ClockTick => {
            let mut guard = app.lock().await;
            guard.on_clock_tick();
            true
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::ScoreboardLoaded { scoreboard } => {
            let mut guard = app.lock().await;
            guard.on_scoreboard_loaded(scoreboard);
        }
        NetworkResponse::StandingsLoaded { standings } => {
            let mut guard = app.lock().await;
            guard.on_standings_loaded(standings);
        }
        NetworkResponse::BracketLoaded { bracket } => {
            let mut guard = app.lock().await;
            guard.on_bracket_loaded(bracket);
        }
        NetworkResponse::SummaryLoaded { summary } => {
            let mut guard = app.lock().await;
            guard.on_summary_loaded(summary);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn handle_push_event(
    push_event: PushEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match push_event {
        PushEvent::Connected => {
            let mut guard = app.lock().await;
            guard.on_push_connected();
        }
        PushEvent::Disconnected => {
            let mut guard = app.lock().await;
            guard.on_push_disconnected();
        }
        PushEvent::Scoreboard(scoreboard) => {
            let mut guard = app.lock().await;
            guard.on_push_scoreboard(scoreboard);
        }
        PushEvent::Changed(resource) => {
            {
                let mut guard = app.lock().await;
                guard.on_push_change_notice();
            }
            let request = match resource {
                ChangedResource::Scoreboard => NetworkRequest::RefreshScoreboard,
                ChangedResource::Standings => NetworkRequest::RefreshStandings,
                ChangedResource::Bracket => NetworkRequest::RefreshBracket,
                ChangedResource::Summary => NetworkRequest::RefreshSummary,
            };
            let _ = network_requests.send(request).await;
            return false;
        }
        PushEvent::Error(message) => {
            let mut guard = app.lock().await;
            guard.on_push_error(message);
            return false;
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
