use crate::state::app_settings::AppSettings;
use crate::state::app_state::{self, AppState};
use crate::state::clock::ClockFlags;
use courtside_api::{Bracket, Scoreboard, Standings, TournamentSummary};
use log::warn;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Board,
    Standings,
    Bracket,
    Summary,
    Help,
}

impl MenuItem {
    /// View name reported to the analytics beacon.
    pub fn analytics_view(self) -> &'static str {
        match self {
            MenuItem::Board => "board",
            MenuItem::Standings => "standings",
            MenuItem::Bracket => "bracket",
            MenuItem::Summary => "summary",
            MenuItem::Help => "help",
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_scoreboard_loaded(&mut self, scoreboard: Option<Scoreboard>) {
        self.state.last_error = None;
        self.state.board.apply(scoreboard);
        self.apply_auto_tab();
    }

    pub fn on_standings_loaded(&mut self, standings: Standings) {
        self.state.last_error = None;
        self.state.standings.standings = standings;
        self.state.standings.scroll_offset = 0;
        self.apply_auto_tab();
    }

    pub fn on_bracket_loaded(&mut self, bracket: Bracket) {
        self.state.last_error = None;
        self.state.bracket.load(bracket);
        self.apply_auto_tab();
    }

    pub fn on_summary_loaded(&mut self, summary: Option<TournamentSummary>) {
        self.state.last_error = None;
        self.state.summary.summary = summary;
        self.apply_auto_tab();
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Clock — resync runs in BoardState::apply, ticks land here
    // -----------------------------------------------------------------------

    pub fn on_clock_tick(&mut self) {
        self.state.board.clock.tick();
    }

    pub fn clock_flags(&self) -> ClockFlags {
        self.state.board.clock.flags()
    }

    // -----------------------------------------------------------------------
    // Push channel handlers
    // -----------------------------------------------------------------------

    pub fn on_push_connected(&mut self) {
        self.state.push.connected = true;
    }

    pub fn on_push_disconnected(&mut self) {
        self.state.push.connected = false;
    }

    pub fn on_push_error(&mut self, message: String) {
        // Push failures are routine (venue wifi); the poller still runs.
        warn!("push channel: {message}");
    }

    pub fn on_push_scoreboard(&mut self, scoreboard: Option<Scoreboard>) {
        self.state.push.mark_event();
        self.on_scoreboard_loaded(scoreboard);
    }

    pub fn on_push_change_notice(&mut self) {
        self.state.push.mark_event();
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    /// User picked a tab by hand: switch, pin, and report whether anything
    /// changed (a change is what earns an analytics ping).
    pub fn select_tab(&mut self, next: MenuItem) -> bool {
        self.state.tab_pinned = true;
        self.update_tab(next)
    }

    fn update_tab(&mut self, next: MenuItem) -> bool {
        if self.state.active_tab == next {
            return false;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next == MenuItem::Standings {
            self.state.standings.scroll_offset = 0;
        }
        if next == MenuItem::Summary {
            self.state.summary.scroll_offset = 0;
        }
        true
    }

    /// Re-derive the initial tab whenever data arrives, until the user pins
    /// one manually.
    fn apply_auto_tab(&mut self) {
        if self.state.tab_pinned {
            return;
        }
        let next = app_state::auto_tab(&self.state);
        if next != self.state.active_tab {
            self.update_tab(next);
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Per-view navigation — delegated to the view states
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        self.state.bracket.navigate_round_next();
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket.navigate_round_prev();
    }

    pub fn bracket_tie_down(&mut self) {
        self.state.bracket.navigate_tie_down();
    }

    pub fn bracket_tie_up(&mut self) {
        self.state.bracket.navigate_tie_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_api::{MatchStatus, TimerSnapshot};

    fn live_scoreboard() -> Scoreboard {
        Scoreboard {
            match_id: "m-1".into(),
            status: MatchStatus::InProgress,
            timer: Some(TimerSnapshot {
                remaining_seconds: Some(600.0),
                is_running: true,
                ..TimerSnapshot::default()
            }),
            ..Scoreboard::default()
        }
    }

    #[test]
    fn scoreboard_load_resyncs_the_clock_and_auto_selects_board() {
        let mut app = App::new();
        app.on_scoreboard_loaded(Some(live_scoreboard()));
        assert_eq!(app.state.active_tab, MenuItem::Board);
        assert_eq!(app.state.board.clock.current().remaining_seconds, 600);
        assert!(app.clock_flags().is_live());
    }

    #[test]
    fn pinned_tab_survives_data_arrivals() {
        let mut app = App::new();
        assert!(app.select_tab(MenuItem::Summary));
        app.on_scoreboard_loaded(Some(live_scoreboard()));
        assert_eq!(app.state.active_tab, MenuItem::Summary);
    }

    #[test]
    fn reselecting_the_active_tab_earns_no_ping() {
        let mut app = App::new();
        assert!(app.select_tab(MenuItem::Bracket));
        assert!(!app.select_tab(MenuItem::Bracket));
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = App::new();
        app.select_tab(MenuItem::Standings);
        app.select_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Standings);
    }
}
