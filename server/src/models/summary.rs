use super::match_document::ParticipantStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub stats: ParticipantStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub won: bool,
    pub rank: u32,
    pub team_id: String,
    pub teammates: Vec<Participant>,
}

impl Roster {
    pub fn player_names(&self) -> Vec<String> {
        self.teammates
            .iter()
            .map(|p| p.stats.name.clone())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// One match seen from the requesting player's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub game_mode: String,
    /// Clock text, e.g. `31:07`.
    pub duration: String,
    pub date: DateTime<Utc>,
    /// Display name of the map; `map_name` keeps the upstream identifier.
    pub map: String,
    pub map_name: String,
    pub player: Participant,
    pub team: Roster,
    pub enemies: Option<Roster>,
    pub telemetry_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesQuery {
    pub player_id: String,
}
