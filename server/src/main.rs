mod config;
mod db;
mod error;
#[cfg(test)]
mod fixtures;
mod handlers;
mod models;
mod services;
mod state;
mod upstream;
mod validation;

use config::Config;
use db::Db;
use ntex::web;
use ntex_cors::Cors;
use state::AppState;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use upstream::HttpUpstream;

#[ntex::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env();

    let db = Db::open(&config.database_path).map_err(io::Error::other)?;
    match db.purge_expired() {
        Ok(purged) => tracing::info!(purged, path = %config.database_path, "cache opened"),
        Err(err) => tracing::warn!(error = %err, "could not purge expired cache entries"),
    }

    let upstream = HttpUpstream::new(&config).map_err(io::Error::other)?;
    let bind = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        config,
        cache: Box::new(db),
        upstream: Box::new(upstream),
    });

    tracing::info!(%bind, shard = %state.config.shard, "PUBG stats server starting");

    web::HttpServer::new(move || {
        web::App::new()
            .state(state.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .route("/api/health", web::get().to(health))
            // Players and seasons
            .route("/api/player/{player}", web::get().to(handlers::player::get_player))
            .route(
                "/api/player/{player}/season",
                web::get().to(handlers::player::get_current_season),
            )
            .route("/api/seasons", web::get().to(handlers::player::get_seasons))
            // Matches
            .route("/api/matches/{matches}", web::get().to(handlers::matches::get_matches))
            .route(
                "/api/matches/{match_id}/telemetry",
                web::get().to(handlers::matches::get_match_telemetry),
            )
    })
    .bind(bind)?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::fixtures::{character, event, lost_match};
    use crate::upstream::stub::StubUpstream;
    use crate::validation::PlayerRef;
    use serde_json::json;

    const M1: &str = "aaaaaaaa-0000-4000-8000-000000000001";
    const M2: &str = "aaaaaaaa-0000-4000-8000-000000000002";
    const TELEMETRY_URL: &str =
        "https://telemetry-cdn.pubg.com/bluehole-pubg/steam/2024/05/01/telemetry.json";

    fn to_body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_db_open_in_memory() {
        let db = Db::open_in_memory().expect("Failed to open in-memory DB");
        db.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='cache_entries'",
                [],
                |row| row.get(0),
            )?;
            assert_eq!(count, 1);
            Ok(())
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_player_to_matches_to_telemetry() {
        let player = json!({ "data": {
            "type": "player",
            "id": "account.focus",
            "attributes": { "name": "focus", "shardId": "steam" },
            "relationships": { "matches": { "data": [
                { "type": "match", "id": M1 },
                { "type": "match", "id": M2 }
            ] } }
        } });
        let log = json!([
            event(
                "LogVehicleLeave",
                "2024-05-01T10:01:00Z",
                json!({ "character": character("focus"), "vehicle": { "vehicleId": "DummyTransportAircraft_C" } })
            ),
            event(
                "LogPlayerKill",
                "2024-05-01T10:09:00Z",
                json!({ "attackId": 9, "killer": character("winner2"), "victim": character("mate"),
                        "damageCauserName": "WeapM416_C", "distance": 4200.0 })
            )
        ]);
        let state = AppState {
            config: Config::default(),
            cache: Box::new(Db::open_in_memory().unwrap()),
            upstream: Box::new(
                StubUpstream::default()
                    .with("/shards/steam/players/account.focus", to_body(player))
                    .with(
                        &format!("/shards/steam/matches/{}", M1),
                        to_body(lost_match(M1, "2024-05-01T10:00:00Z")),
                    )
                    .with(TELEMETRY_URL, to_body(log)),
            ),
        };

        let profile = services::player::get_player(&state, &PlayerRef::Account("account.focus".into()))
            .await
            .unwrap();
        let summaries =
            services::matches::get_match_summaries(&state, &profile.match_ids, &profile.id)
                .await
                .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, M1);
        assert!(!summaries[0].team.won);
        assert_eq!(summaries[0].map, "Erangel");

        let report = services::matches::get_match_telemetry(&state, M1, &profile.id)
            .await
            .unwrap();
        assert_eq!(report.enemy_kills["winner2"].len(), 1);
        assert!(report.team_kills["focus"].is_empty());
    }

    #[tokio::test]
    async fn test_unknown_player_maps_to_not_found_status() {
        let state = AppState {
            config: Config::default(),
            cache: Box::new(Db::open_in_memory().unwrap()),
            upstream: Box::new(StubUpstream::default()),
        };
        let err = services::player::get_player(&state, &PlayerRef::Account("account.none".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 404, .. }));
        assert_eq!(err.status().as_u16(), 404);
    }
}
