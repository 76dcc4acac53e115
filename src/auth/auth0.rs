//! Auth0 access token verification against the tenant's JWKS.

use super::{AuthError, Claims, TokenVerifier};
use crate::config::ResolvedAuth;
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Minimum time between two JWKS downloads.
pub const JWKS_REFETCH_COOLDOWN: Duration = Duration::from_secs(30);

/// Cached signing keys and the time of the last download attempt.
#[derive(Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
        let jwk = self.keys.as_ref()?.find(kid)?;
        Some(DecodingKey::from_jwk(jwk).map_err(AuthError::from))
    }

    fn cooling_down(&self, cooldown: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < cooldown)
    }
}

/// Verifies RS256 access tokens issued by an Auth0 tenant.
///
/// Signing keys are cached. A token naming an unknown key id triggers a
/// reload, at most once per cooldown period.
pub struct Auth0Verifier {
    issuer: String,
    jwks_url: String,
    audience: Option<String>,
    refetch_cooldown: Duration,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl Auth0Verifier {
    /// Create a verifier for the configured tenant.
    pub fn new(auth: &ResolvedAuth) -> Self {
        let jwks_url = format!("{}.well-known/jwks.json", auth.issuer_url);
        Self::with_jwks_url(&auth.issuer_url, &jwks_url, auth.audience.clone())
    }

    pub fn with_jwks_url(issuer: &str, jwks_url: &str, audience: Option<String>) -> Self {
        Self {
            issuer: issuer.to_string(),
            jwks_url: jwks_url.to_string(),
            audience,
            refetch_cooldown: JWKS_REFETCH_COOLDOWN,
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    /// Override the minimum time between JWKS downloads.
    pub fn with_refetch_cooldown(mut self, cooldown: Duration) -> Self {
        self.refetch_cooldown = cooldown;
        self
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        info!(url = %self.jwks_url, "Loading signing keys");
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::Jwks(e.to_string()))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(key) = cache.find(kid) {
                return key;
            }
            if cache.cooling_down(self.refetch_cooldown) {
                debug!(kid, "Unknown signing key, JWKS reload on cooldown");
                return Err(AuthError::UnknownKey(kid.to_string()));
            }
        }

        // The write lock is held across the download so concurrent misses
        // wait for one fetch instead of starting their own.
        let mut cache = self.cache.write().await;
        if let Some(key) = cache.find(kid) {
            return key;
        }
        if cache.cooling_down(self.refetch_cooldown) {
            return Err(AuthError::UnknownKey(kid.to_string()));
        }

        debug!(kid, "Signing key not cached");
        cache.fetched_at = Some(Instant::now());
        cache.keys = Some(self.fetch_jwks().await?);
        cache
            .find(kid)
            .unwrap_or_else(|| Err(AuthError::UnknownKey(kid.to_string())))
    }
}

#[async_trait]
impl TokenVerifier for Auth0Verifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)?;
        debug!(sub = %data.claims.sub, "Token verified");
        Ok(data.claims)
    }
}
