use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::jwt::JwtError;

/// Claims carried by both access and refresh tokens.
///
/// The token kind is not encoded here: it is decided by the key that signs
/// the token and the lifetime applied when it is minted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display name (username at issuance)
    pub name: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per minted token
    pub jti: String,
}

impl Claims {
    /// Create claims for a user, valid for `lifetime` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `username` - Username embedded as the `name` claim
    /// * `issuer` - Deployment issuer string
    /// * `audience` - Deployment audience string
    /// * `lifetime` - Duration until the token expires
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry instant is not representable
    pub fn for_user(
        user_id: impl ToString,
        username: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        Self::issued_at(Utc::now(), user_id, username, issuer, audience, lifetime)
    }

    /// Same as [`Claims::for_user`] with an explicit issuance instant.
    pub fn issued_at(
        now: DateTime<Utc>,
        user_id: impl ToString,
        username: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = now.checked_add_signed(lifetime).ok_or_else(|| {
            JwtError::EncodingFailed(format!("token lifetime {} overflows", lifetime))
        })?;

        Ok(Self {
            sub: user_id.to_string(),
            name: username.into(),
            iss: issuer.into(),
            aud: audience.into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Override expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
