use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
const CERTS_TTL: Duration = Duration::from_secs(3600);

/// Identity asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdTokenError {
    #[error("invalid id token: {0}")]
    Invalid(String),
    #[error("id token verification unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<GoogleIdentity, IdTokenError>;
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<serde_json::Value>,
}

impl GoogleClaims {
    fn is_email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(v)) => *v,
            Some(serde_json::Value::String(v)) => v == "true",
            _ => false,
        }
    }
}

/// Checks Google ID tokens against Google's published signing keys.
pub struct GoogleIdTokenVerifier {
    client: reqwest::Client,
    client_id: Option<String>,
    certs: RwLock<Option<(Instant, JwkSet)>>,
}

impl GoogleIdTokenVerifier {
    pub fn new(client: reqwest::Client, client_id: Option<String>) -> Self {
        Self {
            client,
            client_id,
            certs: RwLock::new(None),
        }
    }

    async fn fetch_certs(&self) -> Result<JwkSet, IdTokenError> {
        debug!("fetching Google signing keys");
        self.client
            .get(GOOGLE_CERTS_URL)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| IdTokenError::Unavailable(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| IdTokenError::Unavailable(e.to_string()))
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdTokenError> {
        {
            let cached = self.certs.read().await;
            if let Some((fetched_at, set)) = cached.as_ref() {
                if fetched_at.elapsed() < CERTS_TTL {
                    if let Some(jwk) = set.find(kid) {
                        return DecodingKey::from_jwk(jwk)
                            .map_err(|e| IdTokenError::Invalid(e.to_string()));
                    }
                }
            }
        }

        // unknown kid or stale cache: Google rotates keys
        let set = self.fetch_certs().await?;
        let key = set
            .find(kid)
            .ok_or_else(|| IdTokenError::Invalid(format!("unknown signing key {kid}")))
            .and_then(|jwk| {
                DecodingKey::from_jwk(jwk).map_err(|e| IdTokenError::Invalid(e.to_string()))
            });
        *self.certs.write().await = Some((Instant::now(), set));
        key
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, token: &str) -> Result<GoogleIdentity, IdTokenError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| IdTokenError::Unavailable("GOOGLE_CLIENT_ID is not configured".into()))?;

        let header = decode_header(token).map_err(|e| IdTokenError::Invalid(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| IdTokenError::Invalid("missing key id".into()))?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let claims = decode::<GoogleClaims>(token, &key, &validation)
            .map_err(|e| {
                warn!(error = %e, "rejected Google id token");
                IdTokenError::Invalid(e.to_string())
            })?
            .claims;

        if !claims.is_email_verified() {
            return Err(IdTokenError::Invalid("email not verified".into()));
        }
        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| IdTokenError::Invalid("missing email claim".into()))?;

        Ok(GoogleIdentity { email })
    }
}

/// Accepts `good:<email>`, reports `down` as an outage and rejects the rest.
#[cfg(test)]
pub struct StubVerifier;

#[cfg(test)]
#[async_trait]
impl IdTokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<GoogleIdentity, IdTokenError> {
        match token {
            "down" => Err(IdTokenError::Unavailable("google unreachable".into())),
            t if t.starts_with("good:") => Ok(GoogleIdentity {
                email: t.trim_start_matches("good:").to_string(),
            }),
            _ => Err(IdTokenError::Invalid("bad signature".into())),
        }
    }
}
