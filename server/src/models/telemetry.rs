//! Telemetry log events and the per-player report built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the flat telemetry log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    #[serde(rename = "_D")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "_T")]
pub enum EventKind {
    #[serde(rename = "LogVehicleLeave", alias = "VehicleLeave")]
    VehicleLeave(VehicleLeave),
    #[serde(rename = "LogPlayerPosition", alias = "PlayerPosition")]
    PlayerPosition(PlayerPosition),
    #[serde(rename = "LogPlayerAttack", alias = "PlayerAttack")]
    PlayerAttack(PlayerAttack),
    #[serde(rename = "LogPlayerTakeDamage", alias = "PlayerTakeDamage")]
    PlayerTakeDamage(PlayerTakeDamage),
    #[serde(rename = "LogPlayerKill", alias = "PlayerKill")]
    PlayerKill(PlayerKill),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub team_id: i64,
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub ranking: i64,
    #[serde(default)]
    pub account_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub vehicle_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLeave {
    #[serde(default)]
    pub character: Character,
    #[serde(default)]
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    #[serde(default)]
    pub character: Character,
    #[serde(default)]
    pub elapsed_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAttack {
    pub attack_id: i64,
    #[serde(default)]
    pub attacker: Character,
    #[serde(default)]
    pub attack_type: String,
    #[serde(default)]
    pub weapon: Option<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTakeDamage {
    #[serde(default)]
    pub attack_id: i64,
    #[serde(default)]
    pub attacker: Option<Character>,
    #[serde(default)]
    pub victim: Option<Character>,
    #[serde(default)]
    pub damage_type_category: String,
    /// Body part that was hit, e.g. `HeadShot`.
    #[serde(default)]
    pub damage_reason: String,
    #[serde(default)]
    pub damage: f64,
    /// Weapon or object that dealt the damage.
    #[serde(default)]
    pub damage_causer_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKill {
    #[serde(default)]
    pub attack_id: i64,
    #[serde(default)]
    pub killer: Option<Character>,
    #[serde(default)]
    pub victim: Option<Character>,
    #[serde(default)]
    pub damage_type_category: String,
    #[serde(default)]
    pub damage_reason: String,
    #[serde(default)]
    pub damage_causer_name: String,
    #[serde(default)]
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub timestamp: DateTime<Utc>,
    pub elapsed_time: f64,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kill {
    pub timestamp: DateTime<Utc>,
    pub attack_id: i64,
    pub victim: Option<Character>,
    pub damage_reason: String,
    pub damage_causer_name: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartDamage {
    pub body_part: String,
    pub total_damage: f64,
}

/// A damage event joined with the attack that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageHit {
    pub timestamp: DateTime<Utc>,
    pub attack_id: i64,
    pub damage: f64,
    pub damage_reason: String,
    pub damage_type_category: String,
    pub attacker: Option<Character>,
    pub victim: Option<Character>,
    pub weapon: Option<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponDamage {
    pub weapon: String,
    pub total_damage: f64,
    pub hits: Vec<DamageHit>,
}

pub type PerPlayer<T> = BTreeMap<String, T>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryReport {
    pub team_attacks: PerPlayer<Vec<WeaponDamage>>,
    pub team_kills: PerPlayer<Vec<Kill>>,
    pub team_movements: PerPlayer<Vec<Movement>>,
    pub team_damage_map: PerPlayer<Vec<BodyPartDamage>>,
    pub enemy_attacks: PerPlayer<Vec<WeaponDamage>>,
    pub enemy_kills: PerPlayer<Vec<Kill>>,
    pub enemy_movements: PerPlayer<Vec<Movement>>,
    pub enemy_damage_map: PerPlayer<Vec<BodyPartDamage>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryQuery {
    pub player_id: String,
}
