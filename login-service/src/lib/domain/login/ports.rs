use async_trait::async_trait;

use crate::domain::login::models::AuthenticatedUser;
use crate::domain::login::models::Identity;
use crate::domain::login::models::LoginCommand;
use crate::domain::login::models::NewUser;
use crate::domain::login::models::SignupCommand;
use crate::domain::login::models::User;
use crate::domain::login::models::Username;
use crate::login::errors::LoginError;

/// Port for login domain service operations.
#[async_trait]
pub trait LoginServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Arguments
    /// * `command` - Raw username (trimmed here) and verbatim password
    ///
    /// # Returns
    /// Authenticated user with a fresh token pair
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password, indistinguishably
    /// * `DatabaseError` - Credential lookup failed
    /// * `Token` - Token signing failed
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedUser, LoginError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated and stays valid until it
    /// expires, so repeated calls with the same token each mint a new
    /// access token.
    ///
    /// # Returns
    /// New access token, or None when the token is malformed, signed with
    /// another key, expired, or its subject no longer resolves
    async fn refresh(&self, refresh_token: &str) -> Option<String>;

    /// Register a new credential record and log it in.
    ///
    /// # Errors
    /// * `UsernameTaken` - Username already exists
    /// * `DatabaseError` - Persistence failed
    async fn signup(&self, command: SignupCommand) -> Result<AuthenticatedUser, LoginError>;

    /// Resolve the identity carried by an access token.
    ///
    /// # Errors
    /// * `Token` - Token invalid, expired, or not an access token
    /// * `InvalidUserId` - `sub` claim is not a user id
    fn current_user(&self, access_token: &str) -> Result<Identity, LoginError>;
}

/// Credential store lookups.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Retrieve a credential record by exact username.
    ///
    /// # Returns
    /// Optional user (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, LoginError>;

    /// Persist a new credential record.
    ///
    /// # Returns
    /// Stored user with its assigned id
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, LoginError>;
}
