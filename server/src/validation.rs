use crate::error::AppError;
use uuid::Uuid;

pub const ACCOUNT_PREFIX: &str = "account.";
const MAX_PLAYER_REF_LEN: usize = 64;

/// A player is addressed either by account id (`account.<hex>`) or by in-game
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerRef {
    Account(String),
    Name(String),
}

pub fn validate_player_ref(raw: &str) -> Result<PlayerRef, AppError> {
    let trimmed = raw.trim();

    if let Some(suffix) = trimmed.strip_prefix(ACCOUNT_PREFIX) {
        if suffix.is_empty()
            || suffix.len() > MAX_PLAYER_REF_LEN
            || !suffix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AppError::BadRequest(format!("Invalid account id: {}", trimmed)));
        }
        return Ok(PlayerRef::Account(trimmed.to_string()));
    }

    if trimmed.is_empty()
        || trimmed.len() > MAX_PLAYER_REF_LEN
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::BadRequest(format!("Invalid player name: {}", trimmed)));
    }
    Ok(PlayerRef::Name(trimmed.to_string()))
}

/// Account id of the player whose point of view a match is summarised from.
pub fn validate_account_id(raw: &str) -> Result<String, AppError> {
    match validate_player_ref(raw)? {
        PlayerRef::Account(id) => Ok(id),
        PlayerRef::Name(_) => Err(AppError::BadRequest(format!(
            "Expected an account id, got: {}",
            raw.trim()
        ))),
    }
}

/// Splits a pipe-separated list of match ids, dropping blanks and repeats.
pub fn parse_match_ids(raw: &str, max: usize) -> Result<Vec<String>, AppError> {
    let mut ids: Vec<String> = Vec::new();
    for part in raw.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        let id = Uuid::parse_str(part)
            .map_err(|_| AppError::BadRequest(format!("Invalid match id: {}", part)))?
            .hyphenated()
            .to_string();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(AppError::BadRequest("At least one match id is required".into()));
    }
    if ids.len() > max {
        return Err(AppError::BadRequest(format!(
            "At most {} match ids may be requested at once",
            max
        )));
    }
    Ok(ids)
}
