use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Claims carried by a session token: the caller-supplied identity plus timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token generation error: {0}")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 session tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::default();
        // expiry is exact; no grace period for clock skew
        validation.leeway = 0;
        // identities may carry their own `aud`; tokens are not audience-scoped
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.token_secret, Duration::seconds(security.token_ttl_secs))
    }

    /// Sign `identity` into a token that expires `ttl` from now.
    pub fn issue(&self, mut identity: Map<String, Value>) -> Result<String, AuthError> {
        // timing claims are always ours, never the caller's
        identity.remove("exp");
        identity.remove("iat");

        let now = Utc::now();
        let claims = Claims {
            identity,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::TokenGeneration)
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }
}
