use crate::state::network::LoadingState;
use courtside_api::{Bracket, Scoreboard, Standings, TournamentSummary};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    RefreshScoreboard,
    RefreshStandings,
    RefreshBracket,
    RefreshSummary,
    /// Analytics beacon — answered with silence, never with a response.
    ViewPing { view: &'static str },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// None means the backend reports no active match right now.
    ScoreboardLoaded { scoreboard: Option<Scoreboard> },
    StandingsLoaded { standings: Standings },
    BracketLoaded { bracket: Bracket },
    SummaryLoaded { summary: Option<TournamentSummary> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// One wall-clock second elapsed while the match clock is live.
    ClockTick,
}
