//! SportsData.io scores and box-score endpoints.

use serde_json::{Map, Value};

use crate::config::ProviderEndpoint;
use crate::types::{EndpointPair, League, Request};

const AUTH_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// `GamesByDate/{date}`; `date` is `YYYY-MM-DD` or `YYYY-MMM-DD`
pub fn games_by_date_endpoints(
    endpoint: &ProviderEndpoint,
    api_key: &str,
    league: League,
    date: &str,
) -> EndpointPair {
    endpoint.pair(|base| {
        Request::get(format!(
            "{}/{}/scores/json/GamesByDate/{}",
            base,
            league.path(),
            date
        ))
        .with_header(AUTH_HEADER, api_key)
    })
}

/// Box score for one game
pub fn player_stats_endpoints(
    endpoint: &ProviderEndpoint,
    api_key: &str,
    league: League,
    game_id: i64,
) -> EndpointPair {
    endpoint.pair(|base| {
        Request::get(format!(
            "{}/{}/stats/json/PlayerGameStatsByGame/{}",
            base,
            league.path(),
            game_id
        ))
        .with_header(AUTH_HEADER, api_key)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Final,
    /// Postponed, canceled, suspended or forfeited
    Void,
    /// Scheduled or in progress
    Pending,
}

impl GameStatus {
    pub fn parse(status: &str) -> Self {
        match status.trim() {
            "Final" | "F/OT" | "F/SO" | "Closed" => GameStatus::Final,
            "Postponed" | "Canceled" | "Cancelled" | "Suspended" | "Forfeit" | "NotNecessary" => {
                GameStatus::Void
            }
            _ => GameStatus::Pending,
        }
    }
}

/// One row from GamesByDate
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub game_id: Option<i64>,
    pub home_team: String,
    pub away_team: String,
    pub status: GameStatus,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

impl Game {
    pub fn involves(&self, home: &str, away: &str) -> bool {
        (self.home_team.eq_ignore_ascii_case(home) && self.away_team.eq_ignore_ascii_case(away))
            || (self.home_team.eq_ignore_ascii_case(away)
                && self.away_team.eq_ignore_ascii_case(home))
    }
}

/// Rows without both team codes are skipped
pub fn parse_games(league: League, payload: &Value) -> Vec<Game> {
    let (home_field, away_field) = league.score_fields();
    payload
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    Some(Game {
                        game_id: row
                            .get("GameID")
                            .or_else(|| row.get("GameId"))
                            .and_then(Value::as_i64),
                        home_team: row.get("HomeTeam")?.as_str()?.to_string(),
                        away_team: row.get("AwayTeam")?.as_str()?.to_string(),
                        status: GameStatus::parse(
                            row.get("Status").and_then(Value::as_str).unwrap_or(""),
                        ),
                        home_score: row.get(home_field).and_then(Value::as_i64),
                        away_score: row.get(away_field).and_then(Value::as_i64),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Find the game between two teams, in either home/away order
pub fn find_game<'a>(games: &'a [Game], home: &str, away: &str) -> Option<&'a Game> {
    games.iter().find(|g| g.involves(home, away))
}

/// One player's row from PlayerGameStatsByGame
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLine {
    pub name: String,
    pub stats: Map<String, Value>,
}

/// Rows without a `Name` are skipped
pub fn parse_player_lines(payload: &Value) -> Vec<PlayerLine> {
    payload
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let stats = row.as_object()?;
                    Some(PlayerLine {
                        name: stats.get("Name")?.as_str()?.to_string(),
                        stats: stats.clone(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
