use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use jsonwebtoken::errors::ErrorKind;
use marquee_application::TokenVerifier;
use marquee_core::AuthError;
use marquee_domain::Claims;
use serde::Deserialize;
use tokio::sync::RwLock;

/// RS256 token verifier backed by the issuer's published JWKS document.
///
/// The key set is cached for `cache_ttl`; a zero TTL disables caching and
/// refetches on every verification.
pub struct JwksTokenVerifier {
    http_client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: Option<String>,
    #[serde(default)]
    n: String,
    #[serde(default)]
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    #[serde(default)]
    keys: Vec<Jwk>,
}

impl JwksTokenVerifier {
    /// Creates a verifier for tokens issued by `https://{domain}/` for the
    /// given API audience.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        domain: &str,
        audience: &str,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            http_client,
            jwks_url: format!("https://{domain}/.well-known/jwks.json"),
            issuer: format!("https://{domain}/"),
            audience: audience.to_owned(),
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    async fn signing_keys(&self) -> Result<Vec<Jwk>, AuthError> {
        if !self.cache_ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.fetched_at.elapsed() < self.cache_ttl
            {
                return Ok(cached.keys.clone());
            }
        }

        let key_set = self
            .http_client
            .get(self.jwks_url.as_str())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| {
                AuthError::KeyResolutionFailed(format!("failed to fetch JWKS: {error}"))
            })?
            .json::<JwkSet>()
            .await
            .map_err(|error| {
                AuthError::KeyResolutionFailed(format!("failed to parse JWKS: {error}"))
            })?;

        tracing::debug!(keys = key_set.keys.len(), "refreshed JWKS");

        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedKeys {
                keys: key_set.keys.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(key_set.keys)
    }
}

#[async_trait]
impl TokenVerifier for JwksTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::KeyResolutionFailed("token header has no key id".to_owned()))?;

        let keys = self.signing_keys().await?;
        let jwk = keys
            .iter()
            .find(|key| key.kid.as_deref() == Some(kid.as_str()))
            .ok_or_else(|| {
                AuthError::KeyResolutionFailed(format!("no signing key matches kid '{kid}'"))
            })?;

        let decoding_key =
            DecodingKey::from_rsa_components(jwk.n.as_str(), jwk.e.as_str()).map_err(|error| {
                AuthError::KeyResolutionFailed(format!("unusable signing key: {error}"))
            })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let decoded = decode::<Claims>(token, &decoding_key, &validation).map_err(|error| {
            match error.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
                _ => AuthError::MalformedToken,
            }
        })?;

        Ok(decoded.claims)
    }
}
