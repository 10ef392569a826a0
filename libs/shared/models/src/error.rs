use thiserror::Error;

/// Failures surfaced to callers of the service wrappers. Every variant holds
/// the message meant for display, either taken from the API response body or
/// a fixed fallback for the operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Maps a non-success HTTP status to its category.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => AppError::Unauthorized(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            400..=499 => AppError::Validation(message),
            _ => AppError::Server(message),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Network(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Server(msg)
            | AppError::Decode(msg)
            | AppError::Config(msg) => msg,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }
}
