use std::time::Duration;

use thiserror::Error;

/// Why a request to the classification backend failed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response arrived within the configured timeout.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Connection refused, DNS failure, reset, and similar.
    #[error("failed to reach the server: {0}")]
    Transport(String),

    /// Non-2xx status. `message` is the server's `error` field, if any.
    #[error("server returned HTTP {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// The body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The text shown to the user when a prediction request fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => format!("Error: {message}"),
            Self::Status { .. } | Self::Malformed(_) => "Error: Failed to classify text".to_string(),
            Self::Transport(_) => "Error: Failed to connect to the server".to_string(),
            Self::Timeout(_) => "Error: Request timed out".to_string(),
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}
