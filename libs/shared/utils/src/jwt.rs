//! Read-only inspection of session tokens.
//!
//! Only the payload segment is decoded. The signature segment is never
//! checked here: the API re-validates every token it receives, and the
//! claims read on the client only drive navigation and display.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{Identity, TokenClaims};

#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("Invalid token format")]
    Format,

    #[error("Invalid claims encoding")]
    Encoding,

    #[error("Invalid claims format: {0}")]
    Claims(String),
}

/// Decodes the claims segment into the typed claim set.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(TokenError::Format);
    }

    // Some issuers keep the base64 padding.
    let claims_b64 = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice::<TokenClaims>(&bytes).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::Claims(e.to_string())
    })
}

pub fn claims(token: &str) -> Option<TokenClaims> {
    decode_claims(token).ok()
}

pub fn identity(token: &str) -> Option<Identity> {
    claims(token).map(Identity::from)
}

/// True when the token decodes and its expiry lies after `now` (seconds).
pub fn is_valid_at(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) if !claims.is_expired_at(now) => true,
        Ok(claims) => {
            debug!("Token expired at {} (now: {})", claims.exp, now);
            false
        }
        Err(e) => {
            debug!("Rejecting undecodable token: {}", e);
            false
        }
    }
}

pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, Utc::now().timestamp())
}

/// Exact, case-sensitive role lookup. Expiry is not considered.
pub fn has_role(token: &str, role: &str) -> bool {
    claims(token).is_some_and(|claims| claims.has_role(role))
}
