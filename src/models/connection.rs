//! Repository connection status.

/// Result of checking the configured repository and token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Token, owner or repository is missing.
    NotConfigured,
    /// Repository reachable with write access.
    Connected,
    /// Repository reachable but the token cannot push.
    ReadOnly,
    /// Repository does not exist or is invisible to the token.
    RepositoryNotFound,
    /// Token rejected.
    InvalidToken,
    /// Any other HTTP status.
    HttpError(u16),
    /// Request never got a response.
    Unreachable(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Short label for status lines.
    pub fn label(&self) -> String {
        match self {
            Self::NotConfigured => "not configured".to_string(),
            Self::Connected => "connected".to_string(),
            Self::ReadOnly => "insufficient permissions".to_string(),
            Self::RepositoryNotFound => "repository not found".to_string(),
            Self::InvalidToken => "authentication error".to_string(),
            Self::HttpError(status) => format!("error: {}", status),
            Self::Unreachable(_) => "network error".to_string(),
        }
    }

    /// Longer guidance for statuses the user can fix.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotConfigured => {
                Some("Set token, owner and repo with 'ghlink config set'.".to_string())
            }
            Self::ReadOnly => Some(
                "Connected, but the token has no write access. Check the token's 'repo' scope."
                    .to_string(),
            ),
            Self::RepositoryNotFound => {
                Some("Repository not found. Check the owner and repository names.".to_string())
            }
            Self::InvalidToken => Some("The token is invalid. Enter it again.".to_string()),
            Self::Unreachable(msg) => Some(msg.clone()),
            Self::Connected | Self::HttpError(_) => None,
        }
    }
}
