//! Bearer token verification.
//!
//! Verification is delegated to the identity provider through the
//! [`TokenVerifier`] trait; the HTTP layer only checks the scopes of the
//! claims it gets back.

mod auth0;

pub use auth0::Auth0Verifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims of a verified access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub iss: Option<String>,
    /// Audience, either a string or a list of strings.
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
    #[serde(default)]
    pub exp: Option<u64>,
    /// Space-separated OAuth scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// Auth0 RBAC permissions.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Claims {
    /// All scopes granted by the token.
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .chain(self.permissions.iter().map(String::as_str))
            .collect()
    }

    /// Required scopes this token does not carry.
    pub fn missing_scopes<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        let granted = self.scopes();
        required
            .iter()
            .map(String::as_str)
            .filter(|scope| !granted.contains(scope))
            .collect()
    }
}

/// Token verification failures.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token header has no key id")]
    MissingKeyId,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("no signing key with id '{0}'")]
    UnknownKey(String),

    #[error("could not load signing keys: {0}")]
    Jwks(String),

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Verifies bearer tokens issued by the identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw bearer token and return its claims.
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(scopes: &[&str]) -> Vec<String> {
        scopes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scopes_from_scope_and_permissions() {
        let claims = Claims {
            scope: Some("openid profile  email".to_string()),
            permissions: vec!["read:transcripts".to_string()],
            ..Claims::default()
        };
        assert_eq!(
            claims.scopes(),
            vec!["openid", "profile", "email", "read:transcripts"]
        );
    }

    #[test]
    fn test_missing_scopes() {
        let claims = Claims {
            scope: Some("openid email".to_string()),
            ..Claims::default()
        };
        let required = required(&["openid", "profile", "email", "phone"]);
        assert_eq!(claims.missing_scopes(&required), vec!["profile", "phone"]);

        let none = Claims::default();
        assert_eq!(none.missing_scopes(&required).len(), 4);
    }

    #[test]
    fn test_claims_deserialize_audience_list() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "auth0|123",
            "aud": ["https://mcp.example.com/", "https://tenant.auth0.com/userinfo"],
            "exp": 1_900_000_000u64,
            "scope": "openid"
        }))
        .unwrap();
        assert_eq!(claims.sub, "auth0|123");
        assert!(claims.aud.unwrap().is_array());
    }
}
