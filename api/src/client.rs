use crate::wire::{
    BracketResponse, BracketRoundWire, PenaltyWire, ScoreboardWire, StandingsResponse,
    SummaryWire, TieWire,
};
use crate::{
    Bracket, BracketRound, BracketTie, GroupTable, KnockoutRound, MatchStatus, Penalty,
    Scoreboard, ScorerLine, StandingRow, Standings, TeamScore, TeamSide, TimerSnapshot,
    TournamentSummary,
};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8088/api";

/// Tournament backend client. Base URL comes from `COURTSIDE_API`, falling
/// back to the local development backend.
#[derive(Debug, Clone)]
pub struct TournamentApi {
    client: Client,
    base_url: String,
    tournament: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl TournamentApi {
    pub fn new(tournament: impl Into<String>) -> Self {
        let base_url = std::env::var("COURTSIDE_API")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url, tournament)
    }

    pub fn with_base_url(base_url: impl Into<String>, tournament: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("courtside/0.1 (terminal tournament board)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tournament: tournament.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn tournament(&self) -> &str {
        &self.tournament
    }

    /// Fetch the live scoreboard for the featured match.
    ///
    /// Returns `Ok(None)` when no match is active (the backend answers with
    /// an empty object or 404). `COURTSIDE_SCOREBOARD_JSON` overrides the
    /// network with a local snapshot file, useful for venue dry runs.
    pub async fn fetch_scoreboard(&self) -> ApiResult<Option<Scoreboard>> {
        if let Ok(path) = std::env::var("COURTSIDE_SCOREBOARD_JSON")
            && !path.trim().is_empty()
        {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ApiError::NotFound(format!("could not read {path}: {e}")))?;
            let raw: ScoreboardWire = serde_json::from_str(&content)
                .map_err(|e| ApiError::NotFound(format!("invalid scoreboard json at {path}: {e}")))?;
            return Ok(map_scoreboard(raw));
        }

        let url = format!("{}/tournaments/{}/scoreboard", self.base_url, self.tournament);
        let raw: ScoreboardWire = self.get(&url).await?;
        Ok(map_scoreboard(raw))
    }

    /// Fetch pre-computed group standings.
    pub async fn fetch_standings(&self) -> ApiResult<Standings> {
        let url = format!("{}/tournaments/{}/standings", self.base_url, self.tournament);
        let raw: StandingsResponse = self.get(&url).await?;
        Ok(map_standings(raw))
    }

    /// Fetch the knockout bracket, seeded and decided upstream.
    pub async fn fetch_bracket(&self) -> ApiResult<Bracket> {
        let url = format!("{}/tournaments/{}/bracket", self.base_url, self.tournament);
        let raw: BracketResponse = self.get(&url).await?;
        Ok(map_bracket(raw))
    }

    /// Fetch the fan-facing tournament summary. `Ok(None)` when the backend
    /// has nothing published for this tournament.
    pub async fn fetch_summary(&self) -> ApiResult<Option<TournamentSummary>> {
        let url = format!("{}/tournaments/{}/summary", self.base_url, self.tournament);
        let raw: SummaryWire = self.get(&url).await?;
        Ok(map_summary(raw))
    }

    /// Analytics beacon: record that a dashboard view was opened. Client
    /// errors are swallowed — a failed ping must never surface on a board.
    pub async fn post_view_ping(&self, view: &str) -> ApiResult<()> {
        let url = format!("{}/tournaments/{}/analytics/view", self.base_url, self.tournament);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "view": view }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        match response.error_for_status() {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(())
                } else {
                    Err(ApiError::Api(e, url))
                }
            }
        }
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

/// Map a scoreboard payload. `None` when the payload carries no match id —
/// the backend's way of saying nothing is on court right now.
pub fn map_scoreboard(raw: ScoreboardWire) -> Option<Scoreboard> {
    let match_id = raw.match_id.as_deref()?.to_string();

    let timer = map_timer(&raw);
    let penalties = raw.penalties.iter().map(map_penalty).collect();

    Some(Scoreboard {
        match_id,
        stage: raw.stage.unwrap_or_default(),
        status: raw.status.as_deref().map(parse_status).unwrap_or_default(),
        home: raw.home.map(map_team).unwrap_or_default(),
        away: raw.away.map(map_team).unwrap_or_default(),
        timer,
        penalties,
        tip_off: parse_instant(raw.tip_off.as_deref()),
    })
}

/// Build a timer snapshot from the six timer fields on the scoreboard
/// object. `None` when the backend sent none of them at all.
fn map_timer(raw: &ScoreboardWire) -> Option<TimerSnapshot> {
    let any_present = raw.remaining_seconds.is_some()
        || raw.extra_elapsed_seconds.is_some()
        || raw.halftime_pause_remaining.is_some()
        || raw.is_running.is_some()
        || raw.is_halftime_break.is_some()
        || raw.is_extra_time.is_some();
    if !any_present {
        return None;
    }

    Some(TimerSnapshot {
        remaining_seconds: raw.remaining_seconds,
        extra_elapsed_seconds: raw.extra_elapsed_seconds,
        halftime_pause_remaining: raw.halftime_pause_remaining,
        is_running: raw.is_running.unwrap_or(false),
        is_halftime_break: raw.is_halftime_break.unwrap_or(false),
        is_extra_time: raw.is_extra_time.unwrap_or(false),
    })
}

fn map_team(t: crate::wire::TeamWire) -> TeamScore {
    let name = t.name.unwrap_or_default();
    TeamScore {
        short_name: t.short_name.unwrap_or_else(|| name.clone()),
        name,
        points: t.points.unwrap_or_default(),
    }
}

fn map_penalty(p: &PenaltyWire) -> Penalty {
    Penalty {
        side: p.side.as_deref().map(parse_side).unwrap_or_default(),
        player: p.player.clone().unwrap_or_default(),
        number: p.number,
        // Penalty countdowns render as whole seconds; the backend may send
        // fractions mid-tick.
        remaining_seconds: p.remaining_seconds.map(|s| s.max(0.0).trunc() as u32),
    }
}

fn map_standings(raw: StandingsResponse) -> Standings {
    let groups = raw
        .groups
        .into_iter()
        .map(|g| GroupTable {
            name: g.name.unwrap_or_else(|| "Group".to_string()),
            rows: g
                .rows
                .into_iter()
                .map(|r| StandingRow {
                    team: r.team.unwrap_or_default(),
                    played: r.played.unwrap_or_default(),
                    won: r.won.unwrap_or_default(),
                    lost: r.lost.unwrap_or_default(),
                    points_for: r.points_for.unwrap_or_default(),
                    points_against: r.points_against.unwrap_or_default(),
                    points: r.points.unwrap_or_default(),
                })
                .collect(),
        })
        .collect();
    Standings { groups }
}

fn map_bracket(raw: BracketResponse) -> Bracket {
    let mut rounds: Vec<BracketRound> = raw.rounds.into_iter().map(map_bracket_round).collect();
    rounds.sort_by_key(|r| r.kind);
    Bracket { rounds }
}

fn map_bracket_round(raw: BracketRoundWire) -> BracketRound {
    BracketRound {
        kind: raw.round.as_deref().map(parse_round).unwrap_or_default(),
        ties: raw.ties.iter().map(map_tie).collect(),
    }
}

fn map_tie(t: &TieWire) -> BracketTie {
    BracketTie {
        id: t.id.clone().unwrap_or_default(),
        home: t.home.clone().unwrap_or_else(|| "TBD".to_string()),
        away: t.away.clone().unwrap_or_else(|| "TBD".to_string()),
        score: t.home_score.zip(t.away_score),
        winner: t.winner.as_deref().map(parse_side),
        scheduled: parse_instant(t.scheduled.as_deref()),
    }
}

fn map_summary(raw: SummaryWire) -> Option<TournamentSummary> {
    let name = raw.name.as_deref()?.to_string();
    Some(TournamentSummary {
        name,
        season: raw.season.unwrap_or_default(),
        is_public: raw.is_public.unwrap_or(false),
        matches_played: raw.matches_played.unwrap_or_default(),
        matches_total: raw.matches_total.unwrap_or_default(),
        champion: raw.champion,
        top_scorers: raw
            .top_scorers
            .into_iter()
            .map(|s| ScorerLine {
                player: s.player.unwrap_or_default(),
                team: s.team.unwrap_or_default(),
                points: s.points.unwrap_or_default(),
                games: s.games.unwrap_or_default(),
            })
            .collect(),
    })
}

fn parse_status(s: &str) -> MatchStatus {
    match s.to_ascii_uppercase().as_str() {
        "LIVE" | "IN_PROGRESS" => MatchStatus::InProgress,
        "BREAK" | "HALFTIME" => MatchStatus::Break,
        "FINAL" | "FULL_TIME" => MatchStatus::Final,
        "POSTPONED" | "CANCELLED" | "SUSPENDED" => MatchStatus::Postponed,
        _ => MatchStatus::Scheduled,
    }
}

fn parse_side(s: &str) -> TeamSide {
    if s.eq_ignore_ascii_case("away") {
        TeamSide::Away
    } else {
        TeamSide::Home
    }
}

fn parse_round(s: &str) -> KnockoutRound {
    match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
        "roundof16" | "r16" => KnockoutRound::RoundOf16,
        "quarterfinal" | "quarterfinals" | "qf" => KnockoutRound::QuarterFinal,
        "semifinal" | "semifinals" | "sf" => KnockoutRound::SemiFinal,
        "thirdplace" | "bronze" => KnockoutRound::ThirdPlace,
        "final" => KnockoutRound::Final,
        _ => KnockoutRound::default(),
    }
}

fn parse_instant(s: Option<&str>) -> Option<DateTime<Utc>> {
    s.and_then(|d| chrono::DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoreboard_json() -> &'static str {
        r#"{
            "matchId": "m-2044",
            "stage": "Semifinal",
            "status": "LIVE",
            "home": {"name": "Riverside Hornets", "shortName": "Hornets", "points": 58},
            "away": {"name": "Bayview Pelicans", "shortName": "Pelicans", "points": 61},
            "remainingSeconds": 431.7,
            "extraElapsedSeconds": 0,
            "halftimePauseRemaining": 0,
            "isRunning": true,
            "isHalftimeBreak": false,
            "isExtraTime": false,
            "penalties": [
                {"side": "away", "player": "K. Odum", "number": 7, "remainingSeconds": 95.2}
            ]
        }"#
    }

    #[test]
    fn scoreboard_maps_teams_and_timer() {
        let raw: ScoreboardWire = serde_json::from_str(scoreboard_json()).unwrap();
        let sb = map_scoreboard(raw).expect("payload carries a match id");
        assert_eq!(sb.match_id, "m-2044");
        assert_eq!(sb.status, MatchStatus::InProgress);
        assert_eq!(sb.home.short_name, "Hornets");
        assert_eq!(sb.away.points, 61);

        let timer = sb.timer.expect("timer fields present");
        assert_eq!(timer.remaining_seconds, Some(431.7));
        assert!(timer.is_running);
        assert!(!timer.is_extra_time);

        assert_eq!(sb.penalties.len(), 1);
        assert_eq!(sb.penalties[0].side, TeamSide::Away);
        assert_eq!(sb.penalties[0].remaining_seconds, Some(95));
    }

    #[test]
    fn scoreboard_without_match_id_is_none() {
        let raw: ScoreboardWire = serde_json::from_str("{}").unwrap();
        assert!(map_scoreboard(raw).is_none());
    }

    #[test]
    fn timer_is_none_when_no_timer_fields_present() {
        let raw: ScoreboardWire =
            serde_json::from_str(r#"{"matchId": "m-1", "status": "SCHEDULED"}"#).unwrap();
        let sb = map_scoreboard(raw).unwrap();
        assert!(sb.timer.is_none());
    }

    #[test]
    fn timer_flags_default_false_when_absent() {
        let raw: ScoreboardWire =
            serde_json::from_str(r#"{"matchId": "m-1", "remainingSeconds": 600}"#).unwrap();
        let timer = map_scoreboard(raw).unwrap().timer.unwrap();
        assert!(!timer.is_running);
        assert!(!timer.is_halftime_break);
        assert_eq!(timer.remaining_seconds, Some(600.0));
    }

    #[test]
    fn team_short_name_falls_back_to_full_name() {
        let raw: ScoreboardWire = serde_json::from_str(
            r#"{"matchId": "m-1", "home": {"name": "Harbor City Gulls", "points": 12}}"#,
        )
        .unwrap();
        let sb = map_scoreboard(raw).unwrap();
        assert_eq!(sb.home.short_name, "Harbor City Gulls");
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("LIVE"), MatchStatus::InProgress);
        assert_eq!(parse_status("break"), MatchStatus::Break);
        assert_eq!(parse_status("FULL_TIME"), MatchStatus::Final);
        assert_eq!(parse_status("POSTPONED"), MatchStatus::Postponed);
        assert_eq!(parse_status("whatever"), MatchStatus::Scheduled);
    }

    #[test]
    fn test_parse_round() {
        assert_eq!(parse_round("roundOf16"), KnockoutRound::RoundOf16);
        assert_eq!(parse_round("quarter_final"), KnockoutRound::QuarterFinal);
        assert_eq!(parse_round("SEMIFINAL"), KnockoutRound::SemiFinal);
        assert_eq!(parse_round("thirdPlace"), KnockoutRound::ThirdPlace);
        assert_eq!(parse_round("final"), KnockoutRound::Final);
    }

    #[test]
    fn test_round_navigation() {
        assert_eq!(KnockoutRound::QuarterFinal.next(), Some(KnockoutRound::SemiFinal));
        assert_eq!(KnockoutRound::Final.next(), None);
        assert_eq!(KnockoutRound::RoundOf16.prev(), None);
    }

    #[test]
    fn bracket_rounds_are_ordered_and_winner_resolves() {
        let raw: BracketResponse = serde_json::from_str(
            r#"{"rounds": [
                {"round": "final", "ties": [
                    {"id": "f1", "home": "Hornets", "away": "Pelicans",
                     "homeScore": 77, "awayScore": 74, "winner": "home"}
                ]},
                {"round": "semifinal", "ties": [
                    {"id": "sf1", "home": "Hornets", "away": "Comets"}
                ]}
            ]}"#,
        )
        .unwrap();
        let bracket = map_bracket(raw);
        assert_eq!(bracket.rounds[0].kind, KnockoutRound::SemiFinal);
        assert_eq!(bracket.rounds[1].kind, KnockoutRound::Final);
        assert!(bracket.has_decided_ties());
        assert_eq!(bracket.rounds[1].ties[0].winner_label(), Some("Hornets"));
    }

    #[test]
    fn summary_without_name_is_none() {
        let raw: SummaryWire = serde_json::from_str("{}").unwrap();
        assert!(map_summary(raw).is_none());
    }

    #[test]
    fn standings_rows_keep_backend_order() {
        let raw: StandingsResponse = serde_json::from_str(
            r#"{"groups": [{"name": "Group A", "rows": [
                {"team": "Comets", "played": 3, "won": 3, "lost": 0, "points": 6},
                {"team": "Gulls", "played": 3, "won": 1, "lost": 2, "points": 2}
            ]}]}"#,
        )
        .unwrap();
        let standings = map_standings(raw);
        assert!(standings.has_rows());
        assert_eq!(standings.groups[0].rows[0].team, "Comets");
        assert_eq!(standings.groups[0].rows[1].points, 2);
    }

    // -----------------------------------------------------------------------
    // End-to-end client tests against a mock backend
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_scoreboard_hits_tournament_scoped_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tournaments/city-cup/scoreboard")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(scoreboard_json())
            .create_async()
            .await;

        let api = TournamentApi::with_base_url(server.url(), "city-cup");
        let sb = api.fetch_scoreboard().await.unwrap().unwrap();
        assert_eq!(sb.match_id, "m-2044");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_scoreboard_degrades_404_to_no_match() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tournaments/city-cup/scoreboard")
            .with_status(404)
            .create_async()
            .await;

        let api = TournamentApi::with_base_url(server.url(), "city-cup");
        assert!(api.fetch_scoreboard().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn view_ping_swallows_client_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/tournaments/city-cup/analytics/view")
            .with_status(410)
            .create_async()
            .await;

        let api = TournamentApi::with_base_url(server.url(), "city-cup");
        assert!(api.post_view_ping("board").await.is_ok());
    }
}
