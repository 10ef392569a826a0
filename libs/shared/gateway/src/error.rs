use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use shared_models::error::AppError;

/// Raw outcome of a failed call, before it is turned into a display message.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status(),
            GatewayError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// The `message` field of a JSON error body, if there is a non-empty one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            GatewayError::Status { body, .. } => serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
                .filter(|msg| !msg.trim().is_empty()),
            _ => None,
        }
    }

    /// Normalizes into the client taxonomy, preferring the server's message
    /// and otherwise using `fallback`.
    pub fn into_app_error(self, fallback: &str) -> AppError {
        let message = self.server_message().unwrap_or_else(|| fallback.to_string());

        match self {
            GatewayError::Status { status, .. } => AppError::from_status(status.as_u16(), message),
            GatewayError::Transport(e) => match e.status() {
                Some(status) => AppError::from_status(status.as_u16(), message),
                None => AppError::Network(message),
            },
            GatewayError::Decode(_) => AppError::Decode(message),
        }
    }
}
