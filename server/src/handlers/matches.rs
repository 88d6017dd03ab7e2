use crate::error::AppError;
use crate::models::summary::MatchesQuery;
use crate::models::telemetry::TelemetryQuery;
use crate::services::matches as service;
use crate::state::AppState;
use crate::validation;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn get_matches(
    state: web::types::State<Arc<AppState>>,
    path: web::types::Path<String>,
    query: web::types::Query<MatchesQuery>,
) -> Result<HttpResponse, AppError> {
    let match_ids =
        validation::parse_match_ids(&path.into_inner(), state.config.max_batch_matches)?;
    let player_id = validation::validate_account_id(&query.player_id)?;
    let summaries = service::get_match_summaries(&state, &match_ids, &player_id).await?;
    Ok(HttpResponse::Ok().json(&summaries))
}

pub async fn get_match_telemetry(
    state: web::types::State<Arc<AppState>>,
    path: web::types::Path<String>,
    query: web::types::Query<TelemetryQuery>,
) -> Result<HttpResponse, AppError> {
    let match_id = validation::parse_match_ids(&path.into_inner(), 1)?.remove(0);
    let player_id = validation::validate_account_id(&query.player_id)?;
    let report = service::get_match_telemetry(&state, &match_id, &player_id).await?;
    Ok(HttpResponse::Ok().json(&report))
}
