//! Per-player aggregation over a match telemetry log.

use crate::error::AppError;
use crate::models::telemetry::{
    BodyPartDamage, DamageHit, EventKind, Kill, Movement, PerPlayer, PlayerAttack,
    PlayerTakeDamage, TelemetryEvent, TelemetryReport, WeaponDamage,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Vehicle ids of the aircraft players parachute from.
pub const DROP_AIRCRAFT: &[&str] = &[
    "DummyTransportAircraft_C",
    "TransportAircraft_Chimera_C",
    "WarModeTransportAircraft_C",
];

/// Display order of hit locations; anything else sorts after these.
const BODY_PART_ORDER: &[&str] = &[
    "HeadShot",
    "TorsoShot",
    "ArmShot",
    "PelvisShot",
    "LegShot",
    "NonSpecific",
];

/// Decodes a raw telemetry log, keeping only the event kinds aggregation uses.
///
/// Entries that fail to decode are skipped rather than failing the log.
pub fn parse_log(bytes: &[u8]) -> Result<Vec<TelemetryEvent>, AppError> {
    let raw: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    let total = raw.len();
    let mut skipped = 0usize;

    let events: Vec<TelemetryEvent> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<TelemetryEvent>(value) {
            Ok(event) if matches!(event.kind, EventKind::Other) => None,
            Ok(event) => Some(event),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, total, "skipped undecodable telemetry events");
    }
    Ok(events)
}

/// Everything the report holds for a single player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTelemetry {
    pub attacks: Vec<WeaponDamage>,
    pub kills: Vec<Kill>,
    pub movements: Vec<Movement>,
    pub damage_map: Vec<BodyPartDamage>,
}

#[derive(Debug, Default)]
struct GroupReport {
    attacks: PerPlayer<Vec<WeaponDamage>>,
    kills: PerPlayer<Vec<Kill>>,
    movements: PerPlayer<Vec<Movement>>,
    damage_map: PerPlayer<Vec<BodyPartDamage>>,
}

impl GroupReport {
    fn collect(events: &[TelemetryEvent], attacks: &AttackIndex<'_>, names: &[String]) -> Self {
        names
            .iter()
            .map(|name| (name, player_telemetry(events, attacks, name)))
            .fold(GroupReport::default(), |mut group, (name, player)| {
                group.attacks.insert(name.clone(), player.attacks);
                group.kills.insert(name.clone(), player.kills);
                group.movements.insert(name.clone(), player.movements);
                group.damage_map.insert(name.clone(), player.damage_map);
                group
            })
    }
}

/// Builds the team report and, when an opposing group is known, the
/// mirrored enemy report.
pub fn aggregate(
    events: &[TelemetryEvent],
    team: &[String],
    enemies: Option<&[String]>,
) -> TelemetryReport {
    let attacks = AttackIndex::build(events);
    let team = GroupReport::collect(events, &attacks, team);
    let enemy = enemies
        .map(|names| GroupReport::collect(events, &attacks, names))
        .unwrap_or_default();

    TelemetryReport {
        team_attacks: team.attacks,
        team_kills: team.kills,
        team_movements: team.movements,
        team_damage_map: team.damage_map,
        enemy_attacks: enemy.attacks,
        enemy_kills: enemy.kills,
        enemy_movements: enemy.movements,
        enemy_damage_map: enemy.damage_map,
    }
}

pub fn player_telemetry(
    events: &[TelemetryEvent],
    attacks: &AttackIndex<'_>,
    name: &str,
) -> PlayerTelemetry {
    let dealt: Vec<(DateTime<Utc>, &PlayerTakeDamage)> = events
        .iter()
        .filter_map(|event| match &event.kind {
            EventKind::PlayerTakeDamage(damage)
                if damage.attacker.as_ref().is_some_and(|a| a.name == name) =>
            {
                Some((event.timestamp, damage))
            }
            _ => None,
        })
        .collect();

    PlayerTelemetry {
        attacks: damage_by_weapon(&dealt, attacks),
        kills: kills(events, name),
        movements: movements(events, name),
        damage_map: damage_by_body_part(&dealt),
    }
}

/// `LogPlayerAttack` events keyed by attack id; the first occurrence wins.
pub struct AttackIndex<'a> {
    by_id: HashMap<i64, &'a PlayerAttack>,
}

impl<'a> AttackIndex<'a> {
    pub fn build(events: &'a [TelemetryEvent]) -> Self {
        let mut by_id = HashMap::new();
        for event in events {
            if let EventKind::PlayerAttack(attack) = &event.kind {
                by_id.entry(attack.attack_id).or_insert(attack);
            }
        }
        AttackIndex { by_id }
    }

    pub fn get(&self, attack_id: i64) -> Option<&'a PlayerAttack> {
        self.by_id.get(&attack_id).copied()
    }
}

/// When the player left the drop aircraft, if they ever did.
pub fn jump_time(events: &[TelemetryEvent], name: &str) -> Option<DateTime<Utc>> {
    events.iter().find_map(|event| match &event.kind {
        EventKind::VehicleLeave(leave)
            if leave.character.name == name
                && DROP_AIRCRAFT.contains(&leave.vehicle.vehicle_id.as_str()) =>
        {
            Some(event.timestamp)
        }
        _ => None,
    })
}

/// Positions from the jump onwards. A player who never left the aircraft has
/// no trace.
pub fn movements(events: &[TelemetryEvent], name: &str) -> Vec<Movement> {
    let Some(jumped_at) = jump_time(events, name) else {
        return Vec::new();
    };

    events
        .iter()
        .filter_map(|event| match &event.kind {
            EventKind::PlayerPosition(position)
                if position.character.name == name && event.timestamp >= jumped_at =>
            {
                Some(Movement {
                    timestamp: event.timestamp,
                    elapsed_time: position.elapsed_time,
                    location: position.character.location,
                })
            }
            _ => None,
        })
        .collect()
}

pub fn kills(events: &[TelemetryEvent], name: &str) -> Vec<Kill> {
    events
        .iter()
        .filter_map(|event| match &event.kind {
            EventKind::PlayerKill(kill) if kill.killer.as_ref().is_some_and(|k| k.name == name) => {
                Some(Kill {
                    timestamp: event.timestamp,
                    attack_id: kill.attack_id,
                    victim: kill.victim.clone(),
                    damage_reason: kill.damage_reason.clone(),
                    damage_causer_name: kill.damage_causer_name.clone(),
                    distance: kill.distance,
                })
            }
            _ => None,
        })
        .collect()
}

fn body_part_rank(body_part: &str) -> usize {
    BODY_PART_ORDER
        .iter()
        .position(|known| *known == body_part)
        .unwrap_or(BODY_PART_ORDER.len())
}

/// Sums in ascending order so a total does not depend on log order.
fn order_independent_sum(mut amounts: Vec<f64>) -> f64 {
    amounts.sort_by(f64::total_cmp);
    amounts.iter().sum()
}

fn damage_by_body_part(dealt: &[(DateTime<Utc>, &PlayerTakeDamage)]) -> Vec<BodyPartDamage> {
    let grouped = dealt
        .iter()
        .fold(BTreeMap::<&str, Vec<f64>>::new(), |mut grouped, (_, damage)| {
            grouped
                .entry(damage.damage_reason.as_str())
                .or_default()
                .push(damage.damage);
            grouped
        });

    let mut by_part: Vec<BodyPartDamage> = grouped
        .into_iter()
        .map(|(body_part, amounts)| BodyPartDamage {
            body_part: body_part.to_string(),
            total_damage: order_independent_sum(amounts),
        })
        .collect();
    by_part.sort_by(|a, b| {
        body_part_rank(&a.body_part)
            .cmp(&body_part_rank(&b.body_part))
            .then_with(|| a.body_part.cmp(&b.body_part))
    });
    by_part
}

fn damage_by_weapon(
    dealt: &[(DateTime<Utc>, &PlayerTakeDamage)],
    attacks: &AttackIndex<'_>,
) -> Vec<WeaponDamage> {
    let grouped = dealt.iter().fold(
        BTreeMap::<&str, Vec<DamageHit>>::new(),
        |mut grouped, (timestamp, damage)| {
            let attack = attacks.get(damage.attack_id);
            grouped
                .entry(damage.damage_causer_name.as_str())
                .or_default()
                .push(DamageHit {
                    timestamp: *timestamp,
                    attack_id: damage.attack_id,
                    damage: damage.damage,
                    damage_reason: damage.damage_reason.clone(),
                    damage_type_category: damage.damage_type_category.clone(),
                    attacker: attack
                        .map(|a| a.attacker.clone())
                        .or_else(|| damage.attacker.clone()),
                    victim: damage.victim.clone(),
                    weapon: attack.and_then(|a| a.weapon.clone()),
                });
            grouped
        },
    );

    grouped
        .into_iter()
        .map(|(weapon, hits)| WeaponDamage {
            weapon: weapon.to_string(),
            total_damage: order_independent_sum(hits.iter().map(|hit| hit.damage).collect()),
            hits,
        })
        .collect()
}
