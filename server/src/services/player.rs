use crate::error::AppError;
use crate::models::player::{
    ApiDocument, PlayerProfile, PlayerRecord, Season, SeasonRecord, SeasonStats, SeasonStatsRecord,
};
use crate::services::cache::wrap_fetch;
use crate::state::AppState;
use crate::validation::PlayerRef;

pub async fn get_player(state: &AppState, player: &PlayerRef) -> Result<PlayerProfile, AppError> {
    match player {
        PlayerRef::Account(account_id) => {
            let key = state.cache_key("player", &[account_id.as_str()]);
            let uri = state.shard_path(&format!("/players/{}", account_id));
            wrap_fetch(state.cache.as_ref(), &key, state.config.ttl.player, || async move {
                let body = state.upstream.fetch(&uri).await?;
                let document: ApiDocument<PlayerRecord> = serde_json::from_slice(&body)?;
                Ok(PlayerProfile::from(document.data))
            })
            .await
        }
        PlayerRef::Name(name) => {
            let key = state.cache_key("player-name", &[name.as_str()]);
            let uri = state.shard_path(&format!("/players?filter[playerNames]={}", name));
            wrap_fetch(state.cache.as_ref(), &key, state.config.ttl.player, || async move {
                let body = state.upstream.fetch(&uri).await?;
                let document: ApiDocument<Vec<PlayerRecord>> = serde_json::from_slice(&body)?;
                document
                    .data
                    .into_iter()
                    .next()
                    .map(PlayerProfile::from)
                    .ok_or_else(|| AppError::NotFound(format!("Player {} not found", name)))
            })
            .await
        }
    }
}

pub async fn get_seasons(state: &AppState) -> Result<Vec<Season>, AppError> {
    let key = state.cache_key("seasons", &[]);
    let uri = state.shard_path("/seasons");
    wrap_fetch(state.cache.as_ref(), &key, state.config.ttl.seasons, || async move {
        let body = state.upstream.fetch(&uri).await?;
        let document: ApiDocument<Vec<SeasonRecord>> = serde_json::from_slice(&body)?;
        Ok(document.data.into_iter().map(Season::from).collect())
    })
    .await
}

/// Stats for the season upstream currently flags with `isCurrentSeason`.
pub async fn get_current_season_stats(
    state: &AppState,
    player: &PlayerRef,
) -> Result<SeasonStats, AppError> {
    let profile = get_player(state, player).await?;
    let seasons = get_seasons(state).await?;
    let season = seasons
        .into_iter()
        .find(|s| s.is_current_season)
        .ok_or_else(|| AppError::NotFound("No current season".into()))?;

    let key = state.cache_key("season-stats", &[profile.id.as_str(), season.id.as_str()]);
    let uri = state.shard_path(&format!("/players/{}/seasons/{}", profile.id, season.id));
    wrap_fetch(state.cache.as_ref(), &key, state.config.ttl.season_stats, || async move {
        let body = state.upstream.fetch(&uri).await?;
        let document: ApiDocument<SeasonStatsRecord> = serde_json::from_slice(&body)?;
        Ok(SeasonStats {
            season_id: season.id,
            player_id: profile.id,
            game_mode_stats: document.data.attributes.game_mode_stats,
        })
    })
    .await
}
