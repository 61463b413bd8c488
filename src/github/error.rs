//! GitHub API errors.

use thiserror::Error;

/// Errors from the GitHub REST API.
///
/// Failures are classified by HTTP status only: 401, 404, and everything
/// else.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Authentication failed: the token is invalid")]
    Unauthorized,

    #[error("Not Found")]
    NotFound,

    #[error("GitHub API error: {status} {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid file content: {0}")]
    Decode(String),

    #[error("Invalid API response: {0}")]
    Json(#[from] serde_json::Error),
}

impl GithubError {
    /// Build an error from a non-success status and the response body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            code => {
                let message = serde_json::from_str::<ApiErrorBody>(body)
                    .ok()
                    .and_then(|b| b.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
                Self::Api {
                    status: code,
                    message,
                }
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[derive(serde::Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

pub type GithubResult<T> = Result<T, GithubError>;
