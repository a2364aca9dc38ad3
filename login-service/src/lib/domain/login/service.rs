use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::StoredPassword;
use auth::TokenIssuer;
use auth::TokenKind;
use auth::TokenPair;
use auth::TokenSettings;

use crate::domain::login::models::AuthenticatedUser;
use crate::domain::login::models::Identity;
use crate::domain::login::models::LoginCommand;
use crate::domain::login::models::NewUser;
use crate::domain::login::models::SignupCommand;
use crate::domain::login::models::User;
use crate::domain::login::models::UserId;
use crate::domain::login::models::Username;
use crate::login::errors::LoginError;
use crate::login::ports::CredentialRepository;
use crate::login::ports::LoginServicePort;

/// Domain service issuing and exchanging tokens for stored credentials.
///
/// Holds no per-user state: every call is an independent lookup plus
/// hashing and signing, so one instance is shared across requests.
pub struct LoginService<CR>
where
    CR: CredentialRepository,
{
    repository: Arc<CR>,
    tokens: TokenIssuer,
    password_hasher: PasswordHasher,
    // Verified against when the username does not exist, so both failure
    // paths pay for a PBKDF2 derivation. The HTTP layer adds random delay on top.
    decoy: StoredPassword,
}

impl<CR> LoginService<CR>
where
    CR: CredentialRepository,
{
    /// Create a login service with the default PBKDF2 work factor.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `settings` - Validated signing keys, issuer/audience and lifetimes
    ///
    /// # Errors
    /// * `Password` - The decoy credential could not be derived
    pub fn new(repository: Arc<CR>, settings: &TokenSettings) -> Result<Self, LoginError> {
        Self::with_hasher(repository, settings, PasswordHasher::new())
    }

    /// Create a login service hashing new passwords with `password_hasher`.
    pub fn with_hasher(
        repository: Arc<CR>,
        settings: &TokenSettings,
        password_hasher: PasswordHasher,
    ) -> Result<Self, LoginError> {
        let decoy = password_hasher.hash("decoy-credential")?;

        Ok(Self {
            repository,
            tokens: TokenIssuer::new(settings),
            password_hasher,
            decoy,
        })
    }

    /// Mint an access token and a refresh token for `user`.
    ///
    /// Both carry the same id and username claims; they differ only in
    /// signing key and lifetime.
    pub fn issue_token_pair(&self, user: &User) -> Result<TokenPair, LoginError> {
        Ok(self
            .tokens
            .issue_token_pair(user.id, user.username.as_str())?)
    }

    async fn verify_password(&self, password: String, stored: StoredPassword) -> bool {
        let hasher = self.password_hasher;

        match tokio::task::spawn_blocking(move || hasher.verify(&password, &stored)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Stored password record is unusable");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    async fn hash_password(&self, password: String) -> Result<StoredPassword, LoginError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| LoginError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(LoginError::from)
    }

    async fn resolve_refresh_subject(&self, refresh_token: &str) -> Option<User> {
        let claims = match self.tokens.validate_refresh_token(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Refresh token rejected");
                return None;
            }
        };

        let username = Username::new(&claims.name).ok()?;
        let user = match self.repository.find_by_username(&username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!(subject = %claims.sub, "Refresh token subject no longer exists");
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Credential lookup failed during refresh");
                return None;
            }
        };

        // A username freed and taken again must not inherit older tokens.
        if user.id.to_string() != claims.sub {
            tracing::info!(subject = %claims.sub, "Refresh token subject no longer matches");
            return None;
        }

        Some(user)
    }
}

#[async_trait]
impl<CR> LoginServicePort for LoginService<CR>
where
    CR: CredentialRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, LoginError> {
        let user = match Username::new(&command.username) {
            Ok(username) => self.repository.find_by_username(&username).await?,
            Err(_) => None,
        };

        let stored = match &user {
            Some(user) => user.password.clone(),
            None => self.decoy.clone(),
        };
        let matches = self.verify_password(command.password, stored).await;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                tracing::info!("Login rejected");
                return Err(LoginError::InvalidCredentials);
            }
        };

        let tokens = self.issue_token_pair(&user)?;
        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username.as_str().to_string(),
            tokens,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Option<String> {
        let user = self.resolve_refresh_subject(refresh_token).await?;

        match self
            .tokens
            .issue(TokenKind::Access, user.id, user.username.as_str())
        {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::error!(error = %e, "Failed to sign refreshed access token");
                None
            }
        }
    }

    async fn signup(&self, command: SignupCommand) -> Result<AuthenticatedUser, LoginError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(LoginError::UsernameTaken(command.username.to_string()));
        }

        let password = self.hash_password(command.password).await?;
        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                password,
            })
            .await?;

        let tokens = self.issue_token_pair(&user)?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username.as_str().to_string(),
            tokens,
        })
    }

    fn current_user(&self, access_token: &str) -> Result<Identity, LoginError> {
        let claims = self.tokens.validate_access_token(access_token)?;

        Ok(Identity {
            id: UserId::from_claim(&claims.sub)?,
            username: claims.name,
        })
    }
}
