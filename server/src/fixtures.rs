//! Builders for upstream-shaped documents used across the test modules.

use serde_json::{json, Value};

pub struct RosterSpec<'a> {
    pub id: &'a str,
    pub won: &'a str,
    pub rank: u32,
    /// `(participant id, account id, in-game name)`
    pub members: &'a [(&'a str, &'a str, &'a str)],
}

pub fn match_json(
    match_id: &str,
    created_at: &str,
    rosters: &[RosterSpec<'_>],
    telemetry_url: Option<&str>,
) -> Value {
    let mut included = Vec::new();
    for (team_id, roster) in rosters.iter().enumerate() {
        let refs: Vec<Value> = roster
            .members
            .iter()
            .map(|(pid, _, _)| json!({ "type": "participant", "id": pid }))
            .collect();
        included.push(json!({
            "type": "roster",
            "id": roster.id,
            "attributes": {
                "won": roster.won,
                "shardId": "steam",
                "stats": { "rank": roster.rank, "teamId": team_id + 1 }
            },
            "relationships": {
                "participants": { "data": refs },
                "team": { "data": null }
            }
        }));
        for (pid, account, name) in roster.members {
            included.push(json!({
                "type": "participant",
                "id": pid,
                "attributes": {
                    "actor": "",
                    "shardId": "steam",
                    "stats": { "playerId": account, "name": name, "kills": 1, "damageDealt": 100.5 }
                }
            }));
        }
    }

    let mut asset_refs = Vec::new();
    if let Some(url) = telemetry_url {
        asset_refs.push(json!({ "type": "asset", "id": format!("asset-{}", match_id) }));
        included.push(json!({
            "type": "asset",
            "id": format!("asset-{}", match_id),
            "attributes": { "URL": url, "name": "telemetry", "createdAt": created_at }
        }));
    }

    let roster_refs: Vec<Value> = rosters
        .iter()
        .map(|r| json!({ "type": "roster", "id": r.id }))
        .collect();

    json!({
        "data": {
            "type": "match",
            "id": match_id,
            "attributes": {
                "createdAt": created_at,
                "duration": 1867,
                "gameMode": "squad-fpp",
                "mapName": "Baltic_Main",
                "shardId": "steam",
                "titleId": "bluehole-pubg",
                "isCustomMatch": false
            },
            "relationships": {
                "rosters": { "data": roster_refs },
                "assets": { "data": asset_refs }
            }
        },
        "included": included
    })
}

/// A two-roster match where `account.focus` plays for the losing rank-2 team.
pub fn lost_match(match_id: &str, created_at: &str) -> Value {
    match_json(
        match_id,
        created_at,
        &[
            RosterSpec {
                id: "roster-lost",
                won: "false",
                rank: 2,
                members: &[
                    ("p-mate", "account.mate", "mate"),
                    ("p-focus", "account.focus", "focus"),
                ],
            },
            RosterSpec {
                id: "roster-winner",
                won: "true",
                rank: 1,
                members: &[
                    ("p-w1", "account.w1", "winner1"),
                    ("p-w2", "account.w2", "winner2"),
                ],
            },
        ],
        Some("https://telemetry-cdn.pubg.com/bluehole-pubg/steam/2024/05/01/telemetry.json"),
    )
}

/// `lost_match` with the telemetry asset stripped of its `URL`.
pub fn lost_match_without_telemetry_url(match_id: &str, created_at: &str) -> Value {
    let mut value = lost_match(match_id, created_at);
    if let Some(included) = value["included"].as_array_mut() {
        for resource in included.iter_mut().filter(|r| r["type"] == "asset") {
            if let Some(attributes) = resource["attributes"].as_object_mut() {
                attributes.remove("URL");
            }
        }
    }
    value
}

pub fn event(tag: &str, at: &str, body: Value) -> Value {
    let mut event = body;
    event["_T"] = json!(tag);
    event["_D"] = json!(at);
    event
}

pub fn character(name: &str) -> Value {
    json!({ "name": name, "teamId": 1, "health": 100.0, "location": { "x": 1.0, "y": 2.0, "z": 3.0 }, "ranking": 0, "accountId": format!("account.{}", name) })
}
