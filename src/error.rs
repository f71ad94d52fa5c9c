//! Lyceum error types

/// Lyceum error types
#[derive(Debug, thiserror::Error)]
pub enum LyceumError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("not found: {0}")]
    NotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LyceumError {
    /// Build an error from a non-success HTTP status and response body.
    ///
    /// The body's `message` (or `error`) field is used when the server sends
    /// a JSON error object; otherwise the raw body text is kept.
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        match status {
            401 | 403 => LyceumError::AuthenticationFailed,
            404 => LyceumError::NotFound(path.to_string()),
            _ => LyceumError::Api {
                status,
                message: error_message(body),
            },
        }
    }
}

impl From<reqwest::Error> for LyceumError {
    fn from(err: reqwest::Error) -> Self {
        LyceumError::Http(err.to_string())
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|field| v.get(field).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Result type alias for Lyceum operations
pub type Result<T> = std::result::Result<T, LyceumError>;
