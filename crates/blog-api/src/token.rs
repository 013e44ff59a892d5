use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use blog_types::api::Claims;

use crate::error::ApiError;

/// Tokens stay valid for a fixed window after issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Source of the current time for issuing and checking expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Issues and verifies HS256-signed bearer tokens.
///
/// Stateless: a token is valid iff its signature matches the secret and its
/// expiry has not passed. There is no revocation list.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock below, without leeway.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
            clock,
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, ApiError> {
        let now = self.clock.now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Token encoding failed: {}", e))?;
        Ok(token)
    }

    /// Returns the user id carried by a valid token.
    pub fn verify(&self, token: &str) -> Result<i64, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!("Rejected token: {}", e);
            ApiError::Authentication("Invalid token")
        })?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(ApiError::Authentication("Token expired"));
        }

        Ok(data.claims.user_id)
    }
}
