//! Admin bearer tokens
//!
//! Tokens are HS256 JWTs shared between the auth service (which signs them)
//! and the API service (which verifies them). The `sid` claim ties a token to
//! a [`SessionRecord`](crate::session::SessionRecord) so logout can revoke it.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;

const MIN_SECRET_LEN: usize = 32;

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Token lifetime in seconds (default: 8 hours)
    pub ttl_seconds: i64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ADMIN_TOKEN_SECRET`: HMAC secret, at least 32 bytes (required)
    /// - `ADMIN_TOKEN_TTL`: lifetime in seconds (default: 28800)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("ADMIN_TOKEN_SECRET").map_err(|_| {
            TokenError::Configuration("ADMIN_TOKEN_SECRET environment variable not set".into())
        })?;

        let ttl_seconds = std::env::var("ADMIN_TOKEN_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(28_800);

        Ok(Self {
            secret,
            ttl_seconds,
        })
    }
}

/// Claims carried by an admin token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin user ID
    pub sub: Uuid,
    /// Session ID
    pub sid: Uuid,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

impl AdminClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Signs and verifies admin tokens
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::Configuration(format!(
                "ADMIN_TOKEN_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if config.ttl_seconds <= 0 {
            return Err(TokenError::Configuration(
                "ADMIN_TOKEN_TTL must be positive".into(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: Duration::seconds(config.ttl_seconds),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `admin_id` bound to session `sid`
    pub fn issue(
        &self,
        admin_id: Uuid,
        sid: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(String, AdminClaims), TokenError> {
        let claims = AdminClaims {
            sub: admin_id,
            sid,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
        let data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
