use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("{0}")]
    Connection(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("search query is empty")]
    EmptyQuery,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl DashboardError {
    /// The text shown at the prompt. Application failures surface exactly
    /// the message the backend sent; everything else falls back to the
    /// error's own rendering.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Api { message, .. } => message.clone(),
            DashboardError::Connection(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
