use std::path::PathBuf;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::Identity;

/// Secret used to sign test tokens. The client never checks it.
pub const TEST_SIGNING_SECRET: &str = "test-secret-key-for-jwt-signing-must-be-long-enough";

pub struct TestConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub admin_role: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            session_file: std::env::temp_dir().join("moviehub-test-session"),
            admin_role: "ROLE_ADMIN".to_string(),
        }
    }
}

impl TestConfig {
    /// Points the client at a mock server, e.g. `wiremock::MockServer::uri()`.
    pub fn with_server(uri: &str) -> Self {
        Self {
            api_base_url: format!("{}/api", uri),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            session_file: self.session_file.clone(),
            admin_role: self.admin_role.clone(),
            request_timeout_secs: 5,
        }
    }
}

pub struct TestUser {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::user("test@example.com")
    }
}

impl TestUser {
    pub fn new(email: &str, roles: &[&str]) -> Self {
        Self {
            user_id: 1,
            email: email.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn user(email: &str) -> Self {
        Self::new(email, &["ROLE_USER"])
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, &["ROLE_ADMIN"])
    }

    pub fn with_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn to_identity(&self) -> Identity {
        Identity {
            subject: self.email.clone(),
            expires_at: Utc::now() + Duration::hours(1),
            roles: self.roles.clone(),
            user_id: Some(self.user_id),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Token for `user` expiring `exp_offset_secs` from now (negative = already expired).
    pub fn create_test_token(user: &TestUser, exp_offset_secs: i64) -> String {
        let now = Utc::now();
        let exp = now + Duration::seconds(exp_offset_secs);

        Self::token_from_payload(json!({
            "sub": user.email,
            "roles": user.roles,
            "userId": user.user_id,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        }))
    }

    pub fn create_expired_token(user: &TestUser) -> String {
        Self::create_test_token(user, -10)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    /// Signs an arbitrary payload, valid or not, with the test secret.
    pub fn token_from_payload(payload: Value) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_SIGNING_SECRET.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }
}

pub struct MockApiResponses;

impl MockApiResponses {
    pub fn auth_response(token: &str) -> Value {
        json!({ "token": token })
    }

    pub fn movie_response(id: i64) -> Value {
        json!({
            "id": id,
            "title": "The Matrix",
            "genre": "Sci-Fi",
            "rating": 8.7,
            "releaseDate": "1999-03-31",
            "posterUrl": "https://posters.example.com/matrix.jpg",
            "description": "A hacker learns the truth about his reality.",
            "averageReviewRating": 4.5,
            "reviewCount": 2
        })
    }

    pub fn movie_page_response(ids: &[i64], page: u32, size: u32, total: u64) -> Value {
        let content: Vec<Value> = ids.iter().map(|id| Self::movie_response(*id)).collect();
        let total_pages = if size == 0 { 0 } else { total.div_ceil(size as u64) };

        json!({
            "content": content,
            "pageable": { "pageNumber": page, "pageSize": size },
            "totalElements": total,
            "totalPages": total_pages,
            "number": page,
            "size": size,
            "numberOfElements": ids.len(),
            "first": page == 0,
            "last": (page as u64 + 1) >= total_pages,
            "empty": ids.is_empty()
        })
    }

    pub fn review_response(id: i64, movie_id: i64, user_id: i64) -> Value {
        json!({
            "id": id,
            "movieId": movie_id,
            "userId": user_id,
            "rating": 4,
            "comment": "Still holds up.",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": null
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "status": 400,
            "error": "Bad Request",
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_server("http://127.0.0.1:4010").to_app_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:4010/api");
        assert_eq!(config.admin_role, "ROLE_ADMIN");
        assert!(config.is_configured());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::admin("admin@example.com").with_id(42);
        assert_eq!(user.roles, vec!["ROLE_ADMIN".to_string()]);

        let identity = user.to_identity();
        assert_eq!(identity.subject, "admin@example.com");
        assert_eq!(identity.user_id, Some(42));
    }

    #[test]
    fn test_jwt_token_creation() {
        let token = JwtTestUtils::create_test_token(&TestUser::default(), 60);

        assert!(token.contains('.'));
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_page_response_shape() {
        let page = MockApiResponses::movie_page_response(&[1, 2], 0, 2, 5);
        assert_eq!(page["totalPages"], 3);
        assert_eq!(page["first"], true);
        assert_eq!(page["last"], false);
    }
}
