use tracing::{debug, info};

use shared_config::AppConfig;
use shared_gateway::ApiClient;
use shared_models::auth::{AuthRequest, AuthResponse, Identity};
use shared_models::error::AppError;
use shared_session::SessionContext;
use shared_utils::jwt;

pub struct AuthService {
    api: ApiClient,
    admin_role: String,
}

impl AuthService {
    pub fn new(api: ApiClient, config: &AppConfig) -> Self {
        Self {
            api,
            admin_role: config.admin_role.clone(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }

    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        debug!("Registering account for: {}", email);
        self.authenticate("/auth/register", email, password, "Registration failed").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        debug!("Logging in: {}", email);
        self.authenticate("/auth/login", email, password, "Login failed").await
    }

    async fn authenticate(
        &self,
        path: &str,
        email: &str,
        password: &str,
        fallback: &str,
    ) -> Result<AuthResponse, AppError> {
        let request = AuthRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: AuthResponse = self.api
            .post(path, &request)
            .await
            .map_err(|e| e.into_app_error(fallback))?;

        match response.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session().establish(token);
                info!("Signed in as {}", email);
            }
            None => debug!("Auth response for {} carried no token", email),
        }

        Ok(response)
    }

    pub fn logout(&self) {
        self.session().end();
    }

    pub fn token(&self) -> Option<String> {
        self.session().token()
    }

    /// A stored token whose expiry is still in the future.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|token| jwt::is_valid(&token))
    }

    pub fn identity(&self) -> Option<Identity> {
        self.token().and_then(|token| jwt::identity(&token))
    }

    pub fn is_admin(&self) -> bool {
        self.token()
            .is_some_and(|token| jwt::is_valid(&token) && jwt::has_role(&token, &self.admin_role))
    }
}
