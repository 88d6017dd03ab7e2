use ntex::http::StatusCode;
use ntex::web::{HttpResponse, WebResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream returned HTTP {status} for {uri}")]
    Upstream { status: u16, uri: String },

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed upstream document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status: 404, .. } => StatusCode::NOT_FOUND,
            AppError::Upstream { status: 429, .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { .. } | AppError::Http(_) | AppError::Json(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Db(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl WebResponseError for AppError {
    fn error_response(&self, _: &ntex::web::HttpRequest) -> HttpResponse {
        let message = match self {
            AppError::Db(_) => "Database error",
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.as_str(),
            AppError::Upstream { status: 404, .. } => "Not found",
            AppError::Upstream { status: 429, .. } => "Upstream rate limit exceeded",
            AppError::Upstream { .. } | AppError::Http(_) => "Upstream unavailable",
            AppError::Json(_) => "Malformed upstream document",
            AppError::Io(_) => "Internal error",
        };
        HttpResponse::build(self.status()).json(&serde_json::json!({ "error": message }))
    }
}
