/// Backend wire types — serde shapes for the tournament REST and push
/// payloads. These map to the clean domain types via the functions in
/// client.rs. Every field is optional: the backend omits what it does not
/// know, and a partial payload must never fail to parse.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Scoreboard  (GET /tournaments/{slug}/scoreboard, also pushed inline)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardWire {
    pub match_id: Option<String>,
    pub stage: Option<String>,
    pub status: Option<String>, // "SCHEDULED" | "LIVE" | "BREAK" | "FINAL" | "POSTPONED"
    pub home: Option<TeamWire>,
    pub away: Option<TeamWire>,
    pub tip_off: Option<String>, // ISO 8601
    #[serde(default)]
    pub penalties: Vec<PenaltyWire>,

    // Timer fields sit directly on the scoreboard object. Numerics may be
    // fractional; flags may be absent entirely.
    pub remaining_seconds: Option<f64>,
    pub extra_elapsed_seconds: Option<f64>,
    pub halftime_pause_remaining: Option<f64>,
    pub is_running: Option<bool>,
    pub is_halftime_break: Option<bool>,
    pub is_extra_time: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamWire {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub points: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyWire {
    pub side: Option<String>, // "home" | "away"
    pub player: Option<String>,
    pub number: Option<u8>,
    pub remaining_seconds: Option<f64>,
}

// ---------------------------------------------------------------------------
// Standings  (GET /tournaments/{slug}/standings)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    #[serde(default)]
    pub groups: Vec<GroupWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GroupWire {
    pub name: Option<String>,
    #[serde(default)]
    pub rows: Vec<StandingRowWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StandingRowWire {
    pub team: Option<String>,
    pub played: Option<u8>,
    pub won: Option<u8>,
    pub lost: Option<u8>,
    pub points_for: Option<u16>,
    pub points_against: Option<u16>,
    pub points: Option<u16>,
}

// ---------------------------------------------------------------------------
// Bracket  (GET /tournaments/{slug}/bracket)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BracketResponse {
    #[serde(default)]
    pub rounds: Vec<BracketRoundWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BracketRoundWire {
    /// "roundOf16" | "quarterfinal" | "semifinal" | "thirdPlace" | "final"
    pub round: Option<String>,
    #[serde(default)]
    pub ties: Vec<TieWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TieWire {
    pub id: Option<String>,
    pub home: Option<String>,
    pub away: Option<String>,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub winner: Option<String>, // "home" | "away"
    pub scheduled: Option<String>, // ISO 8601
}

// ---------------------------------------------------------------------------
// Summary  (GET /tournaments/{slug}/summary)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SummaryWire {
    pub name: Option<String>,
    pub season: Option<String>,
    pub is_public: Option<bool>,
    pub matches_played: Option<u16>,
    pub matches_total: Option<u16>,
    pub champion: Option<String>,
    #[serde(default)]
    pub top_scorers: Vec<ScorerWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScorerWire {
    pub player: Option<String>,
    pub team: Option<String>,
    pub points: Option<u16>,
    pub games: Option<u8>,
}

// ---------------------------------------------------------------------------
// Push-event frames  (WebSocket channel)
// ---------------------------------------------------------------------------

/// One frame from the push channel. `kind` discriminates: "scoreboard"
/// frames carry an inline payload, "changed" frames name a resource that
/// should be refetched over REST.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameWire {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub tournament: Option<String>,
    pub resource: Option<String>, // "standings" | "bracket" | "summary"
    pub scoreboard: Option<ScoreboardWire>,
}
