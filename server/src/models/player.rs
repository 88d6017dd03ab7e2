use super::match_document::Relationships;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{"data": ...}` wrapper shared by every JSON:API response.
#[derive(Debug, Deserialize)]
pub struct ApiDocument<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub relationships: Relationships,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shard_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    pub shard_id: String,
    /// Most recent first, as listed upstream.
    pub match_ids: Vec<String>,
}

impl From<PlayerRecord> for PlayerProfile {
    fn from(record: PlayerRecord) -> Self {
        let match_ids = record
            .relationships
            .get("matches")
            .map(|rel| rel.refs().iter().map(|r| r.id.clone()).collect())
            .unwrap_or_default();
        PlayerProfile {
            id: record.id,
            name: record.attributes.name,
            shard_id: record.attributes.shard_id,
            match_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SeasonRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: SeasonAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonAttributes {
    #[serde(default)]
    pub is_current_season: bool,
    #[serde(default)]
    pub is_offseason: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub is_current_season: bool,
    pub is_offseason: bool,
}

impl From<SeasonRecord> for Season {
    fn from(record: SeasonRecord) -> Self {
        Season {
            id: record.id,
            is_current_season: record.attributes.is_current_season,
            is_offseason: record.attributes.is_offseason,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SeasonStatsRecord {
    #[serde(default)]
    pub attributes: SeasonStatsAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatsAttributes {
    #[serde(default)]
    pub game_mode_stats: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStats {
    pub season_id: String,
    pub player_id: String,
    /// Keyed by game mode (`solo`, `duo-fpp`, ...), passed through as served.
    pub game_mode_stats: BTreeMap<String, serde_json::Value>,
}
