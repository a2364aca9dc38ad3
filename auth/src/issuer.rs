use std::fmt;

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Validated signing material and lifetimes for both token kinds.
///
/// Built once at startup; nothing here is re-read per request.
#[derive(Clone)]
pub struct TokenSettings {
    pub access_key: String,
    pub refresh_key: String,
    pub issuer: String,
    pub audience: String,
    pub access_lifetime: Duration,
    pub refresh_lifetime: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_key", &"<redacted>")
            .field("refresh_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Access and refresh token minted together on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints and validates access and refresh tokens.
///
/// Each kind has its own [`JwtHandler`], so a refresh token never validates
/// as an access token and the other way round.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    issuer: String,
    audience: String,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(settings: &TokenSettings) -> Self {
        Self {
            access: JwtHandler::new(
                settings.access_key.as_bytes(),
                &settings.issuer,
                &settings.audience,
            ),
            refresh: JwtHandler::new(
                settings.refresh_key.as_bytes(),
                &settings.issuer,
                &settings.audience,
            ),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            access_lifetime: settings.access_lifetime,
            refresh_lifetime: settings.refresh_lifetime,
        }
    }

    fn handler(&self, kind: TokenKind) -> &JwtHandler {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Lifetime applied to newly minted tokens of `kind`.
    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        }
    }

    /// Build the claims for `user` as they would be signed right now.
    ///
    /// # Errors
    /// * `EncodingFailed` - The lifetime of `kind` overflows the expiry instant
    pub fn claims_for(
        &self,
        kind: TokenKind,
        user_id: impl ToString,
        username: &str,
    ) -> Result<Claims, JwtError> {
        Claims::for_user(
            user_id,
            username,
            self.issuer.as_str(),
            self.audience.as_str(),
            self.lifetime(kind),
        )
    }

    /// Sign arbitrary claims with the key of `kind`.
    pub fn sign(&self, kind: TokenKind, claims: &Claims) -> Result<String, JwtError> {
        self.handler(kind).encode(claims)
    }

    /// Mint a single token of `kind` for a user.
    pub fn issue(
        &self,
        kind: TokenKind,
        user_id: impl ToString,
        username: &str,
    ) -> Result<String, JwtError> {
        self.sign(kind, &self.claims_for(kind, user_id, username)?)
    }

    /// Mint an access token and a refresh token carrying the same user claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Either token could not be signed
    pub fn issue_token_pair(
        &self,
        user_id: impl ToString,
        username: &str,
    ) -> Result<TokenPair, JwtError> {
        let user_id = user_id.to_string();

        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, &user_id, username)?,
            refresh_token: self.issue(TokenKind::Refresh, &user_id, username)?,
        })
    }

    /// Validate a token against the key of `kind`.
    pub fn validate(&self, kind: TokenKind, token: &str) -> Result<Claims, JwtError> {
        self.handler(kind).decode(token)
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(TokenKind::Access, token)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(TokenKind::Refresh, token)
    }
}
