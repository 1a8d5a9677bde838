use crate::app::MenuItem;
use crate::state::clock::MatchClock;
use chrono::Local;
use courtside_api::{Bracket, KnockoutRound, Scoreboard, Standings, TournamentSummary};

// ---------------------------------------------------------------------------
// Display board state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BoardState {
    /// Latest authoritative scoreboard, None when nothing is on court.
    pub scoreboard: Option<Scoreboard>,
    /// Locally ticking match clock, reconciled against scoreboard snapshots.
    pub clock: MatchClock,
    pub updated_at: Option<String>, // "HH:MM:SS"
}

impl BoardState {
    /// Fold a new authoritative scoreboard into the board. The clock's
    /// drift detector runs against the timer snapshot carried by the
    /// payload before the scoreboard itself is replaced.
    pub fn apply(&mut self, scoreboard: Option<Scoreboard>) {
        self.clock
            .observe(scoreboard.as_ref().and_then(|s| s.timer.as_ref()));
        self.scoreboard = scoreboard;
        self.updated_at = Some(Local::now().format("%H:%M:%S").to_string());
    }
}

// ---------------------------------------------------------------------------
// Fan dashboard states
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StandingsState {
    pub standings: Standings,
    pub scroll_offset: u16,
}

#[derive(Debug, Default)]
pub struct BracketViewState {
    pub bracket: Option<Bracket>,
    /// The round the user has navigated to.
    pub view_round: KnockoutRound,
    pub selected_tie: usize,
}

impl BracketViewState {
    /// Store a freshly loaded bracket and jump the view to the active round.
    pub fn load(&mut self, bracket: Bracket) {
        self.view_round = detect_active_round(&bracket);
        self.selected_tie = 0;
        self.bracket = Some(bracket);
    }

    /// Step forward to the next round the backend actually sent. Optional
    /// rounds (third place, a play-in) may be absent and are skipped over.
    pub fn navigate_round_next(&mut self) {
        let mut cursor = self.view_round;
        while let Some(next) = cursor.next() {
            if self.round_exists(next) {
                self.view_round = next;
                self.selected_tie = 0;
                return;
            }
            cursor = next;
        }
    }

    pub fn navigate_round_prev(&mut self) {
        let mut cursor = self.view_round;
        while let Some(prev) = cursor.prev() {
            if self.round_exists(prev) {
                self.view_round = prev;
                self.selected_tie = 0;
                return;
            }
            cursor = prev;
        }
    }

    pub fn navigate_tie_down(&mut self) {
        let max = self.ties_in_view().saturating_sub(1);
        if self.selected_tie < max {
            self.selected_tie += 1;
        }
    }

    pub fn navigate_tie_up(&mut self) {
        self.selected_tie = self.selected_tie.saturating_sub(1);
    }

    fn round_exists(&self, kind: KnockoutRound) -> bool {
        self.bracket
            .as_ref()
            .is_some_and(|b| b.round(kind).is_some())
    }

    fn ties_in_view(&self) -> usize {
        self.bracket
            .as_ref()
            .and_then(|b| b.round(self.view_round))
            .map(|r| r.ties.len())
            .unwrap_or(0)
    }
}

/// The active knockout round: the earliest round that still has an
/// undecided tie, or the last round once everything is settled.
fn detect_active_round(bracket: &Bracket) -> KnockoutRound {
    for round in &bracket.rounds {
        if round.ties.iter().any(|t| !t.is_decided()) {
            return round.kind;
        }
    }
    bracket
        .rounds
        .last()
        .map(|r| r.kind)
        .unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct SummaryState {
    pub summary: Option<TournamentSummary>,
    pub scroll_offset: u16,
}

/// Connection status of the push channel, shown in the status line.
#[derive(Debug, Default)]
pub struct PushStatus {
    pub connected: bool,
    pub last_event_at: Option<String>, // "HH:MM:SS"
}

impl PushStatus {
    pub fn mark_event(&mut self) {
        self.last_event_at = Some(Local::now().format("%H:%M:%S").to_string());
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    /// Set once the user picks a tab by hand; disables auto-selection.
    pub tab_pinned: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub board: BoardState,
    pub standings: StandingsState,
    pub bracket: BracketViewState,
    pub summary: SummaryState,
    pub push: PushStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Pure view derivations — recomputed on each state transition, no caches
// ---------------------------------------------------------------------------

/// Group tables are hidden for knockout-only tournaments.
pub fn standings_visible(standings: &Standings) -> bool {
    standings.has_rows()
}

/// Fan views are gated on the tournament being published. Until a summary
/// has loaded the answer is unknown; the views stay available rather than
/// flashing a gate at every cold start.
pub fn fan_views_visible(summary: Option<&TournamentSummary>) -> bool {
    summary.map(|s| s.is_public).unwrap_or(true)
}

/// Initial tab choice, re-derived as data arrives: a live match always wins,
/// then a bracket with results, then standings, then the summary.
pub fn auto_tab(state: &AppState) -> MenuItem {
    if state
        .board
        .scoreboard
        .as_ref()
        .is_some_and(|s| s.is_live())
    {
        return MenuItem::Board;
    }

    if fan_views_visible(state.summary.summary.as_ref()) {
        if state
            .bracket
            .bracket
            .as_ref()
            .is_some_and(|b| b.has_decided_ties())
        {
            return MenuItem::Bracket;
        }
        if standings_visible(&state.standings.standings) {
            return MenuItem::Standings;
        }
        if state.summary.summary.is_some() {
            return MenuItem::Summary;
        }
    }

    MenuItem::Board
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_api::{
        BracketRound, BracketTie, GroupTable, MatchStatus, StandingRow, TeamSide,
    };

    fn decided_tie() -> BracketTie {
        BracketTie {
            id: "qf1".into(),
            home: "Hornets".into(),
            away: "Comets".into(),
            score: Some((81, 63)),
            winner: Some(TeamSide::Home),
            scheduled: None,
        }
    }

    fn open_tie() -> BracketTie {
        BracketTie {
            id: "sf1".into(),
            home: "Hornets".into(),
            away: "Winner QF2".into(),
            score: None,
            winner: None,
            scheduled: None,
        }
    }

    #[test]
    fn active_round_is_first_with_an_open_tie() {
        let bracket = Bracket {
            rounds: vec![
                BracketRound { kind: KnockoutRound::QuarterFinal, ties: vec![decided_tie()] },
                BracketRound { kind: KnockoutRound::SemiFinal, ties: vec![open_tie()] },
                BracketRound { kind: KnockoutRound::Final, ties: vec![open_tie()] },
            ],
        };
        assert_eq!(detect_active_round(&bracket), KnockoutRound::SemiFinal);
    }

    #[test]
    fn active_round_falls_back_to_last_when_all_decided() {
        let bracket = Bracket {
            rounds: vec![
                BracketRound { kind: KnockoutRound::SemiFinal, ties: vec![decided_tie()] },
                BracketRound { kind: KnockoutRound::Final, ties: vec![decided_tie()] },
            ],
        };
        assert_eq!(detect_active_round(&bracket), KnockoutRound::Final);
    }

    #[test]
    fn round_navigation_skips_rounds_the_backend_never_sent() {
        let mut view = BracketViewState::default();
        view.load(Bracket {
            rounds: vec![
                BracketRound { kind: KnockoutRound::SemiFinal, ties: vec![open_tie()] },
                BracketRound { kind: KnockoutRound::Final, ties: vec![open_tie()] },
            ],
        });
        assert_eq!(view.view_round, KnockoutRound::SemiFinal);

        // No earlier rounds in this tournament; prev stays put.
        view.navigate_round_prev();
        assert_eq!(view.view_round, KnockoutRound::SemiFinal);

        // ThirdPlace is absent; next jumps straight to the final.
        view.navigate_round_next();
        assert_eq!(view.view_round, KnockoutRound::Final);

        view.navigate_round_prev();
        assert_eq!(view.view_round, KnockoutRound::SemiFinal);
    }

    #[test]
    fn standings_hidden_for_knockout_only_tournaments() {
        assert!(!standings_visible(&Standings::default()));
        let standings = Standings {
            groups: vec![GroupTable {
                name: "Group A".into(),
                rows: vec![StandingRow::default()],
            }],
        };
        assert!(standings_visible(&standings));
    }

    #[test]
    fn private_tournament_gates_fan_views() {
        let mut summary = TournamentSummary {
            name: "Invitational".into(),
            is_public: false,
            ..TournamentSummary::default()
        };
        assert!(!fan_views_visible(Some(&summary)));
        summary.is_public = true;
        assert!(fan_views_visible(Some(&summary)));
        // Unknown until loaded: do not gate.
        assert!(fan_views_visible(None));
    }

    #[test]
    fn auto_tab_prefers_a_live_board() {
        let mut state = AppState::default();
        state.standings.standings.groups.push(GroupTable {
            name: "Group A".into(),
            rows: vec![StandingRow::default()],
        });
        assert_eq!(auto_tab(&state), MenuItem::Standings);

        state.board.scoreboard = Some(Scoreboard {
            match_id: "m-1".into(),
            status: MatchStatus::InProgress,
            ..Scoreboard::default()
        });
        assert_eq!(auto_tab(&state), MenuItem::Board);
    }

    #[test]
    fn auto_tab_falls_back_to_board_when_gated() {
        let mut state = AppState::default();
        state.standings.standings.groups.push(GroupTable {
            name: "Group A".into(),
            rows: vec![StandingRow::default()],
        });
        state.summary.summary = Some(TournamentSummary {
            name: "Invitational".into(),
            is_public: false,
            ..TournamentSummary::default()
        });
        assert_eq!(auto_tab(&state), MenuItem::Board);
    }
}
