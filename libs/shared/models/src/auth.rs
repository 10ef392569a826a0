use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Claims read from the payload segment of a session token.
///
/// `sub` and `exp` are mandatory: a payload missing either one does not
/// deserialize, so callers never see a half-populated claim set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    /// Expiry in seconds since the Unix epoch. Fractional values are truncated.
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(secs) = number.as_i64() {
        return Ok(secs);
    }

    match number.as_f64() {
        Some(secs) if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 => {
            Ok(secs.trunc() as i64)
        }
        _ => Err(de::Error::custom(format!("exp out of range: {}", number))),
    }
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Exact, case-sensitive role match.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Client view of the signed-in user, derived from the token on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
    pub roles: Vec<String>,
    pub user_id: Option<i64>,
}

impl Identity {
    pub fn email(&self) -> &str {
        &self.subject
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Self {
            subject: claims.sub,
            expires_at,
            roles: claims.roles,
            user_id: claims.user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_require_subject_and_expiry() {
        let missing_exp = json!({ "sub": "a@b.com", "roles": ["ROLE_USER"] });
        assert!(serde_json::from_value::<TokenClaims>(missing_exp).is_err());

        let missing_sub = json!({ "exp": 1_900_000_000i64 });
        assert!(serde_json::from_value::<TokenClaims>(missing_sub).is_err());
    }

    #[test]
    fn test_fractional_expiry_is_truncated() {
        let claims: TokenClaims =
            serde_json::from_value(json!({ "sub": "a@b.com", "exp": 1_700_000_000.5 })).unwrap();

        assert_eq!(claims.exp, 1_700_000_000);
        assert!(!claims.is_expired_at(1_699_999_999));
        assert!(claims.is_expired_at(1_700_000_000));
    }

    #[test]
    fn test_non_numeric_expiry_is_rejected() {
        let claims = json!({ "sub": "a@b.com", "exp": "tomorrow" });
        assert!(serde_json::from_value::<TokenClaims>(claims).is_err());
    }

    #[test]
    fn test_roles_default_to_empty() {
        let claims: TokenClaims =
            serde_json::from_value(json!({ "sub": "a@b.com", "exp": 1_900_000_000i64 })).unwrap();

        assert!(claims.roles.is_empty());
        assert!(!claims.has_role("ROLE_ADMIN"));
        assert_eq!(claims.user_id, None);
    }

    #[test]
    fn test_identity_from_claims() {
        let claims: TokenClaims = serde_json::from_value(json!({
            "sub": "admin@moviehub.com",
            "exp": 1_900_000_000i64,
            "roles": ["ROLE_ADMIN", "ROLE_USER"],
            "userId": 7
        }))
        .unwrap();

        let identity = Identity::from(claims);
        assert_eq!(identity.email(), "admin@moviehub.com");
        assert_eq!(identity.expires_at.timestamp(), 1_900_000_000);
        assert_eq!(identity.user_id, Some(7));
        assert!(identity.has_role("ROLE_ADMIN"));
        assert!(!identity.has_role("role_admin"));
    }
}
