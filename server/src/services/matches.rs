use crate::error::AppError;
use crate::models::match_document::MatchDocument;
use crate::models::summary::{MatchSummary, Roster};
use crate::models::telemetry::TelemetryReport;
use crate::services::cache::{fetch_all, wrap_fetch};
use crate::services::composer::compose;
use crate::services::telemetry::{aggregate, parse_log};
use crate::state::AppState;

pub async fn get_match_document(state: &AppState, match_id: &str) -> Result<MatchDocument, AppError> {
    let key = state.cache_key("match", &[match_id]);
    let uri = state.shard_path(&format!("/matches/{}", match_id));

    wrap_fetch(state.cache.as_ref(), &key, state.config.ttl.matches, || async move {
        let body = state.upstream.fetch(&uri).await?;
        Ok(serde_json::from_slice::<MatchDocument>(&body)?)
    })
    .await
}

/// Summaries of `match_ids` from `player_id`'s point of view, newest first.
///
/// Matches that cannot be fetched, or that the player was not part of, are
/// left out. An empty result is reported as `NotFound`.
pub async fn get_match_summaries(
    state: &AppState,
    match_ids: &[String],
    player_id: &str,
) -> Result<Vec<MatchSummary>, AppError> {
    let documents = fetch_all(match_ids, |id| async move {
        get_match_document(state, &id).await
    })
    .await?;

    let mut summaries: Vec<MatchSummary> = documents
        .iter()
        .filter_map(|document| {
            let summary = compose(document, player_id);
            if summary.is_none() {
                tracing::debug!(match_id = %document.data.id, player_id, "player not in match, dropped");
            }
            summary
        })
        .collect();

    if summaries.is_empty() {
        return Err(AppError::NotFound(format!(
            "No matches found for player {}",
            player_id
        )));
    }

    summaries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    tracing::info!(
        player_id,
        requested = match_ids.len(),
        fetched = documents.len(),
        returned = summaries.len(),
        "match batch resolved"
    );
    Ok(summaries)
}

/// Telemetry report for the player's team in one match, mirrored for the
/// winning team when the player's team lost.
pub async fn get_match_telemetry(
    state: &AppState,
    match_id: &str,
    player_id: &str,
) -> Result<TelemetryReport, AppError> {
    let document = get_match_document(state, match_id).await?;
    let summary = compose(&document, player_id).ok_or_else(|| {
        AppError::NotFound(format!("Player {} is not part of match {}", player_id, match_id))
    })?;
    let url = summary
        .telemetry_url
        .clone()
        .ok_or_else(|| AppError::NotFound(format!("No telemetry recorded for match {}", match_id)))?;

    let team = summary.team.player_names();
    let enemies = summary.enemies.as_ref().map(Roster::player_names);
    let key = state.cache_key("telemetry", &[match_id, player_id]);

    wrap_fetch(state.cache.as_ref(), &key, state.config.ttl.telemetry, || async move {
        let body = state.upstream.fetch(&url).await?;
        let events = parse_log(&body)?;
        tracing::debug!(match_id, events = events.len(), "aggregating telemetry");
        Ok(aggregate(&events, &team, enemies.as_deref()))
    })
    .await
}
