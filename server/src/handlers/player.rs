use crate::error::AppError;
use crate::services::player as service;
use crate::state::AppState;
use crate::validation;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn get_player(
    state: web::types::State<Arc<AppState>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let player = validation::validate_player_ref(&path.into_inner())?;
    let profile = service::get_player(&state, &player).await?;
    Ok(HttpResponse::Ok().json(&profile))
}

pub async fn get_current_season(
    state: web::types::State<Arc<AppState>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let player = validation::validate_player_ref(&path.into_inner())?;
    let stats = service::get_current_season_stats(&state, &player).await?;
    Ok(HttpResponse::Ok().json(&stats))
}

pub async fn get_seasons(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let seasons = service::get_seasons(&state).await?;
    Ok(HttpResponse::Ok().json(&seasons))
}
