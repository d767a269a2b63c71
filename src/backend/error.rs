use thiserror::Error;

/// Failures talking to the recipe backend.
///
/// `Display` is the text shown to the user after the flow's own prefix.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure or undecodable success body
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status; `message` is the body's `error` field or a generic fallback
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Audio reference that cannot be resolved against the backend URL
    #[error("invalid audio URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build a status error from a response body, falling back to the code
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<super::types::ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP error: {}", status));
        ApiError::Status { status, message }
    }
}
