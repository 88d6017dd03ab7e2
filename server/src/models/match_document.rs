//! JSON:API match document as served by `/shards/{shard}/matches/{id}`.
//!
//! Records in `included` point at each other through `{type, id}` stubs; see
//! `services::resolver` for how those stubs are turned back into records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDocument {
    pub data: MatchRecord,
    #[serde(default)]
    pub included: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub attributes: MatchAttributes,
    #[serde(default)]
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAttributes {
    pub created_at: DateTime<Utc>,
    /// Match length in seconds.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub shard_id: String,
    #[serde(default)]
    pub title_id: String,
    #[serde(default)]
    pub is_custom_match: bool,
    #[serde(default)]
    pub season_state: Option<String>,
}

/// One entry of the `included` bag, tagged by its JSON:API `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    Participant(ParticipantRecord),
    Roster(RosterRecord),
    Asset(AssetRecord),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Participant,
    Roster,
    Asset,
}

impl ResourceKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "participant" => Some(ResourceKind::Participant),
            "roster" => Some(ResourceKind::Roster),
            "asset" => Some(ResourceKind::Asset),
            _ => None,
        }
    }
}

impl Resource {
    /// `(kind, id)` for resolvable records; `None` for unknown types.
    pub fn key(&self) -> Option<(ResourceKind, &str)> {
        match self {
            Resource::Participant(p) => Some((ResourceKind::Participant, p.id.as_str())),
            Resource::Roster(r) => Some((ResourceKind::Roster, r.id.as_str())),
            Resource::Asset(a) => Some((ResourceKind::Asset, a.id.as_str())),
            Resource::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    pub attributes: ParticipantAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantAttributes {
    #[serde(default)]
    pub stats: ParticipantStats,
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub shard_id: String,
}

/// Per-match statistics. Only the join key and the in-game name are typed;
/// every other stat is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: RosterAttributes,
    #[serde(default)]
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterAttributes {
    /// Upstream encodes this as the string `"true"` or `"false"`.
    #[serde(default)]
    pub won: String,
    #[serde(default)]
    pub stats: RosterStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    #[serde(default)]
    pub rank: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub team_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: AssetAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetAttributes {
    #[serde(default, rename = "URL")]
    pub url: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

pub type Relationships = BTreeMap<String, Relationship>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

impl Relationship {
    pub fn refs(&self) -> &[ResourceRef] {
        match &self.data {
            Some(Linkage::Many(refs)) => refs,
            Some(Linkage::One(r)) => std::slice::from_ref(r),
            None => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceRef>),
    One(ResourceRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
