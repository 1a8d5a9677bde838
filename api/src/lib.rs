pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// Live scoreboard for the currently featured match of a tournament.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    pub match_id: String,
    pub stage: String, // "Group A — Matchday 3", "Semifinal", ...
    pub status: MatchStatus,
    pub home: TeamScore,
    pub away: TeamScore,
    /// Authoritative timer reading. None when the backend reports no clock
    /// for this match (e.g. pre-tip-off placeholder boards).
    pub timer: Option<TimerSnapshot>,
    pub penalties: Vec<Penalty>,
    pub tip_off: Option<DateTime<Utc>>,
}

impl Scoreboard {
    pub fn is_live(&self) -> bool {
        matches!(self.status, MatchStatus::InProgress | MatchStatus::Break)
    }

    /// Side currently ahead on points, None when tied.
    pub fn leader(&self) -> Option<TeamSide> {
        match self.home.points.cmp(&self.away.points) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamScore {
    pub name: String,       // "Riverside Hornets"
    pub short_name: String, // "Hornets"
    pub points: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Break,
    Final,
    Postponed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

/// Authoritative timer reading as delivered by the backend.
///
/// Numeric fields are kept raw — possibly fractional, possibly absent — and
/// are clamped into integer seconds by the display-side clock, not here.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimerSnapshot {
    pub remaining_seconds: Option<f64>,
    pub extra_elapsed_seconds: Option<f64>,
    pub halftime_pause_remaining: Option<f64>,
    pub is_running: bool,
    pub is_halftime_break: bool,
    pub is_extra_time: bool,
}

/// A personal penalty shown on the board. Countdowns are advanced upstream;
/// this is render-only data.
#[derive(Debug, Clone, Default)]
pub struct Penalty {
    pub side: TeamSide,
    pub player: String,
    pub number: Option<u8>,
    pub remaining_seconds: Option<u32>,
}

// ---------------------------------------------------------------------------
// Standings — pre-computed group tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Standings {
    pub groups: Vec<GroupTable>,
}

impl Standings {
    /// True when at least one group carries at least one row.
    pub fn has_rows(&self) -> bool {
        self.groups.iter().any(|g| !g.rows.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    pub name: String, // "Group A"
    pub rows: Vec<StandingRow>,
}

/// One table row, already ranked by the backend. Row order is authoritative.
#[derive(Debug, Clone, Default)]
pub struct StandingRow {
    pub team: String,
    pub played: u8,
    pub won: u8,
    pub lost: u8,
    pub points_for: u16,
    pub points_against: u16,
    pub points: u16,
}

// ---------------------------------------------------------------------------
// Bracket — knockout rounds, seeded and decided upstream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Bracket {
    /// Rounds ordered earliest → latest.
    pub rounds: Vec<BracketRound>,
}

impl Bracket {
    pub fn has_decided_ties(&self) -> bool {
        self.rounds
            .iter()
            .flat_map(|r| r.ties.iter())
            .any(|t| t.is_decided())
    }

    pub fn round(&self, kind: KnockoutRound) -> Option<&BracketRound> {
        self.rounds.iter().find(|r| r.kind == kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BracketRound {
    pub kind: KnockoutRound,
    pub ties: Vec<BracketTie>,
}

/// Navigation axis for the bracket view. Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KnockoutRound {
    #[default]
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    ThirdPlace,
    Final,
}

impl KnockoutRound {
    pub fn label(&self) -> &'static str {
        match self {
            KnockoutRound::RoundOf16 => "Round of 16",
            KnockoutRound::QuarterFinal => "Quarterfinals",
            KnockoutRound::SemiFinal => "Semifinals",
            KnockoutRound::ThirdPlace => "Third Place",
            KnockoutRound::Final => "Final",
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            KnockoutRound::RoundOf16 => None,
            KnockoutRound::QuarterFinal => Some(KnockoutRound::RoundOf16),
            KnockoutRound::SemiFinal => Some(KnockoutRound::QuarterFinal),
            KnockoutRound::ThirdPlace => Some(KnockoutRound::SemiFinal),
            KnockoutRound::Final => Some(KnockoutRound::ThirdPlace),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            KnockoutRound::RoundOf16 => Some(KnockoutRound::QuarterFinal),
            KnockoutRound::QuarterFinal => Some(KnockoutRound::SemiFinal),
            KnockoutRound::SemiFinal => Some(KnockoutRound::ThirdPlace),
            KnockoutRound::ThirdPlace => Some(KnockoutRound::Final),
            KnockoutRound::Final => None,
        }
    }
}

/// A single knockout pairing. Team labels are pre-shaped display strings —
/// placeholders like "Winner QF2" arrive as-is from the backend.
#[derive(Debug, Clone, Default)]
pub struct BracketTie {
    pub id: String,
    pub home: String,
    pub away: String,
    pub score: Option<(u16, u16)>, // (home, away)
    pub winner: Option<TeamSide>,
    pub scheduled: Option<DateTime<Utc>>,
}

impl BracketTie {
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner_label(&self) -> Option<&str> {
        match self.winner? {
            TeamSide::Home => Some(self.home.as_str()),
            TeamSide::Away => Some(self.away.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tournament summary — fan-facing aggregate, computed upstream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TournamentSummary {
    pub name: String,
    pub season: String,
    /// Private tournaments are hidden from the fan dashboard views.
    pub is_public: bool,
    pub matches_played: u16,
    pub matches_total: u16,
    pub champion: Option<String>,
    pub top_scorers: Vec<ScorerLine>,
}

#[derive(Debug, Clone, Default)]
pub struct ScorerLine {
    pub player: String,
    pub team: String,
    pub points: u16,
    pub games: u8,
}
