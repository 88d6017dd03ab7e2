//! Builds a player-centric [`MatchSummary`] out of a raw match document.

use crate::models::match_document::{MatchDocument, ParticipantRecord, Resource, RosterRecord};
use crate::models::summary::{MatchSummary, Participant, Roster};

const MAP_NAMES: &[(&str, &str)] = &[
    ("Baltic_Main", "Erangel"),
    ("Erangel_Main", "Erangel"),
    ("Desert_Main", "Miramar"),
    ("Savage_Main", "Sanhok"),
    ("DihorOtok_Main", "Vikendi"),
    ("Summerland_Main", "Karakin"),
    ("Chimera_Main", "Paramo"),
    ("Heaven_Main", "Haven"),
    ("Tiger_Main", "Taego"),
    ("Kiki_Main", "Deston"),
    ("Neon_Main", "Rondo"),
    ("Range_Main", "Camp Jackal"),
];

/// Summarises `document` for the player with account id `player_id`.
///
/// Returns `None` when the player did not take part in the match, or when the
/// document has no roster containing them.
pub fn compose(document: &MatchDocument, player_id: &str) -> Option<MatchSummary> {
    let index = document.index();

    let focus = document.included.iter().find_map(|resource| match resource {
        Resource::Participant(p) if p.attributes.stats.player_id == player_id => Some(p),
        _ => None,
    })?;

    let rosters = index.rosters();
    let Some(team_record) = rosters.iter().copied().find(|roster| has_member(roster, &focus.id)) else {
        tracing::warn!(
            match_id = %document.data.id,
            participant = %focus.id,
            "participant belongs to no roster"
        );
        return None;
    };

    let mut teammates = index.participants_of(team_record);
    teammates.sort_by_key(|p| p.id != focus.id);
    let team = roster_view(team_record, teammates);

    let enemies = if team.won {
        None
    } else {
        rosters
            .iter()
            .find(|roster| roster.attributes.stats.rank == 1 && roster.id != team_record.id)
            .map(|winner| roster_view(winner, index.participants_of(winner)))
    };

    // An asset without a usable URL means no telemetry.
    let telemetry_url = index
        .assets()
        .into_iter()
        .find_map(|asset| asset.attributes.url.clone().filter(|url| !url.is_empty()));

    let attributes = &document.data.attributes;
    Some(MatchSummary {
        id: document.data.id.clone(),
        game_mode: attributes.game_mode.clone(),
        duration: clock(attributes.duration),
        date: attributes.created_at,
        map: map_display_name(&attributes.map_name).to_string(),
        map_name: attributes.map_name.clone(),
        player: participant_view(focus),
        team,
        enemies,
        telemetry_url,
    })
}

fn has_member(roster: &RosterRecord, participant_id: &str) -> bool {
    roster
        .relationships
        .get("participants")
        .is_some_and(|rel| rel.refs().iter().any(|stub| stub.id == participant_id))
}

fn roster_view(record: &RosterRecord, members: Vec<&ParticipantRecord>) -> Roster {
    Roster {
        won: record.attributes.won == "true",
        rank: record.attributes.stats.rank,
        team_id: record.attributes.stats.team_id.clone(),
        teammates: members.into_iter().map(participant_view).collect(),
    }
}

fn participant_view(record: &ParticipantRecord) -> Participant {
    Participant {
        id: record.id.clone(),
        stats: record.attributes.stats.clone(),
    }
}

/// Zero-based clock text for a duration in seconds: `MM:SS`, or `H:MM:SS`
/// from one hour up.
pub fn clock(seconds: u32) -> String {
    let (hours, minutes, secs) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

pub fn map_display_name(map_name: &str) -> &str {
    MAP_NAMES
        .iter()
        .find(|(raw, _)| *raw == map_name)
        .map(|(_, display)| *display)
        .unwrap_or(map_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{lost_match, lost_match_without_telemetry_url, match_json, RosterSpec};

    fn parse(value: serde_json::Value) -> MatchDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lost_match_has_winning_enemies() {
        let doc = parse(lost_match("m1", "2024-05-01T12:00:00Z"));
        let summary = compose(&doc, "account.focus").unwrap();

        assert!(!summary.team.won);
        assert_eq!(summary.team.rank, 2);
        let enemies = summary.enemies.expect("losing team should have enemies");
        assert!(enemies.won);
        assert_eq!(enemies.teammates.len(), 2);
        assert_eq!(enemies.teammates[0].id, "p-w1");
        assert_eq!(enemies.teammates[1].id, "p-w2");
    }

    #[test]
    fn test_single_player_team_against_full_winning_squad() {
        let doc = parse(match_json(
            "m0",
            "2024-05-01T12:00:00Z",
            &[
                RosterSpec {
                    id: "r-solo",
                    won: "false",
                    rank: 2,
                    members: &[("p-x", "X", "x")],
                },
                RosterSpec {
                    id: "r-top",
                    won: "true",
                    rank: 1,
                    members: &[("p-a", "account.a", "a"), ("p-b", "account.b", "b")],
                },
            ],
            None,
        ));
        let summary = compose(&doc, "X").unwrap();

        assert_eq!(summary.player.id, "p-x");
        assert_eq!(summary.player.stats.extra.get("kills"), Some(&serde_json::json!(1)));
        assert!(!summary.team.won);
        assert_eq!(summary.enemies.unwrap().teammates.len(), 2);
    }

    #[test]
    fn test_player_identity_and_focus_first() {
        let doc = parse(lost_match("m1", "2024-05-01T12:00:00Z"));
        let summary = compose(&doc, "account.focus").unwrap();

        assert_eq!(summary.player.id, "p-focus");
        assert_eq!(summary.player.stats.name, "focus");
        let ids: Vec<&str> = summary.team.teammates.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-focus", "p-mate"]);
    }

    #[test]
    fn test_unknown_player_is_not_applicable() {
        let doc = parse(lost_match("m1", "2024-05-01T12:00:00Z"));
        assert!(compose(&doc, "account.stranger").is_none());
    }

    #[test]
    fn test_winning_team_has_no_enemies() {
        let doc = parse(lost_match("m1", "2024-05-01T12:00:00Z"));
        let summary = compose(&doc, "account.w2").unwrap();

        assert!(summary.team.won);
        assert!(summary.enemies.is_none());
        assert_eq!(summary.team.teammates[0].id, "p-w2");
    }

    #[test]
    fn test_missing_rank_one_roster_leaves_enemies_empty() {
        let doc = parse(match_json(
            "m2",
            "2024-05-01T12:00:00Z",
            &[
                RosterSpec {
                    id: "r-a",
                    won: "false",
                    rank: 2,
                    members: &[("p1", "account.x", "x")],
                },
                RosterSpec {
                    id: "r-b",
                    won: "false",
                    rank: 3,
                    members: &[("p2", "account.y", "y")],
                },
            ],
            None,
        ));
        let summary = compose(&doc, "account.x").unwrap();

        assert!(summary.enemies.is_none());
        assert!(summary.telemetry_url.is_none());
    }

    #[test]
    fn test_won_is_a_string_comparison() {
        let doc = parse(match_json(
            "m3",
            "2024-05-01T12:00:00Z",
            &[RosterSpec {
                id: "r-a",
                won: "True",
                rank: 1,
                members: &[("p1", "account.x", "x")],
            }],
            None,
        ));
        let summary = compose(&doc, "account.x").unwrap();
        assert!(!summary.team.won);
    }

    #[test]
    fn test_participant_without_roster_is_dropped() {
        let mut value = lost_match("m4", "2024-05-01T12:00:00Z");
        value["included"]
            .as_array_mut()
            .unwrap()
            .retain(|r| r["type"] != "roster");
        assert!(compose(&parse(value), "account.focus").is_none());
    }

    #[test]
    fn test_asset_without_url_keeps_the_match() {
        let doc = parse(lost_match_without_telemetry_url("m6", "2024-05-01T12:00:00Z"));
        let summary = compose(&doc, "account.focus").unwrap();

        assert!(summary.telemetry_url.is_none());
        assert!(summary.enemies.is_some());
    }

    #[test]
    fn test_rosters_come_from_match_relationships() {
        let mut value = lost_match("m7", "2024-05-01T12:00:00Z");
        value["data"]["relationships"]["rosters"]["data"] =
            serde_json::json!([{ "type": "roster", "id": "roster-lost" }]);
        let summary = compose(&parse(value), "account.focus").unwrap();

        assert!(summary.enemies.is_none());
        assert_eq!(summary.team.rank, 2);
    }

    #[test]
    fn test_summary_header_fields() {
        let doc = parse(lost_match("m5", "2024-05-01T12:00:00Z"));
        let summary = compose(&doc, "account.focus").unwrap();

        assert_eq!(summary.id, "m5");
        assert_eq!(summary.game_mode, "squad-fpp");
        assert_eq!(summary.duration, "31:07");
        assert_eq!(summary.map, "Erangel");
        assert_eq!(summary.map_name, "Baltic_Main");
        assert_eq!(summary.date.to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert!(summary.telemetry_url.unwrap().ends_with("telemetry.json"));
    }

    #[test]
    fn test_clock_rendering() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(59), "00:59");
        assert_eq!(clock(1867), "31:07");
        assert_eq!(clock(3725), "1:02:05");
    }

    #[test]
    fn test_unknown_maps_pass_through() {
        assert_eq!(map_display_name("Desert_Main"), "Miramar");
        assert_eq!(map_display_name("Mystery_Main"), "Mystery_Main");
    }
}
