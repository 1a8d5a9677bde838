use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut view_ping: Option<&'static str> = None;

    let mut select = |guard: &mut App, next: MenuItem| {
        if guard.select_tab(next) {
            view_ping = Some(next.analytics_view());
        }
    };

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => select(&mut guard, MenuItem::Board),
        (_, Char('2'), _) => select(&mut guard, MenuItem::Standings),
        (_, Char('3'), _) => select(&mut guard, MenuItem::Bracket),
        (_, Char('4'), _) => select(&mut guard, MenuItem::Summary),
        (_, Char('?'), _) => {
            guard.select_tab(MenuItem::Help);
        }
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.bracket_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.bracket_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.bracket_tie_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.bracket_tie_up(),

        // Standings / summary scrolling
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => {
            guard.state.standings.scroll_offset =
                guard.state.standings.scroll_offset.saturating_add(1);
        }
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => {
            guard.state.standings.scroll_offset =
                guard.state.standings.scroll_offset.saturating_sub(1);
        }
        (MenuItem::Summary, Char('j') | KeyCode::Down, _) => {
            guard.state.summary.scroll_offset =
                guard.state.summary.scroll_offset.saturating_add(1);
        }
        (MenuItem::Summary, Char('k') | KeyCode::Up, _) => {
            guard.state.summary.scroll_offset =
                guard.state.summary.scroll_offset.saturating_sub(1);
        }

        // Manual refresh of everything
        (_, Char('r'), _) => {
            drop(guard);
            for request in [
                NetworkRequest::RefreshScoreboard,
                NetworkRequest::RefreshStandings,
                NetworkRequest::RefreshBracket,
                NetworkRequest::RefreshSummary,
            ] {
                let _ = network_requests.send(request).await;
            }
            return;
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(view) = view_ping {
        drop(guard);
        let _ = network_requests.send(NetworkRequest::ViewPing { view }).await;
    }
}
