use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SESSION_FILE: &str = ".moviehub-session";
pub const DEFAULT_ADMIN_ROLE: &str = "ROLE_ADMIN";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Common prefix of every REST endpoint, e.g. `https://host/api`.
    pub api_base_url: String,
    pub session_file: PathBuf,
    /// Role string that marks elevated privileges.
    pub admin_role: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("MOVIEHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("MOVIEHUB_API_URL not set, using default");
                    DEFAULT_API_URL.to_string()
                }),
            session_file: env::var("MOVIEHUB_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("MOVIEHUB_SESSION_FILE not set, using default");
                    PathBuf::from(DEFAULT_SESSION_FILE)
                }),
            admin_role: env::var("MOVIEHUB_ADMIN_ROLE")
                .unwrap_or_else(|_| DEFAULT_ADMIN_ROLE.to_string()),
            request_timeout_secs: env::var("MOVIEHUB_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| match raw.parse::<u64>() {
                    Ok(secs) if secs > 0 => Some(secs),
                    _ => {
                        warn!("MOVIEHUB_REQUEST_TIMEOUT_SECS is not a positive integer: {}", raw);
                        None
                    }
                })
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - API base URL is missing or malformed");
        }

        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
            && (self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
