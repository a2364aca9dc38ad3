use std::fmt;

use auth::StoredPassword;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::login::errors::LoginError;
use crate::login::errors::PasswordPolicyError;
use crate::login::errors::UserIdError;
use crate::login::errors::UsernameError;

/// Credential record.
///
/// Owned by the credential store; login never mutates it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password: StoredPassword,
    pub created_at: DateTime<Utc>,
}

/// Credential record that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password: StoredPassword,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i32);

impl UserId {
    /// Parse a user ID from the `sub` claim of a token.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not an integer
    pub fn from_claim(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i32>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Surrounding whitespace is trimmed; the remainder is matched exactly
/// (case-sensitive) against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub const MAX_LENGTH: usize = 100;

    /// Create a username from raw input.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 100 characters after trimming
    pub fn new(raw: &str) -> Result<Self, UsernameError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to log in with raw credentials.
///
/// The password is kept verbatim: no trimming, no normalization.
#[derive(Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to register a new credential record.
pub struct SignupCommand {
    pub username: Username,
    pub password: String,
}

impl SignupCommand {
    const MIN_USERNAME_LENGTH: usize = 3;
    const MIN_PASSWORD_LENGTH: usize = 6;
    const MAX_PASSWORD_LENGTH: usize = 100;

    /// Validate signup input.
    ///
    /// # Errors
    /// * `UsernameError` - Username empty, shorter than 3 or longer than 100 characters
    /// * `PasswordPolicyError` - Password shorter than 6 or longer than 100 characters
    pub fn new(username: &str, password: String) -> Result<Self, LoginError> {
        let username = Username::new(username)?;
        if username.len() < Self::MIN_USERNAME_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_USERNAME_LENGTH,
                actual: username.len(),
            }
            .into());
        }

        let length = password.chars().count();
        if length < Self::MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_PASSWORD_LENGTH,
                actual: length,
            }
            .into());
        }
        if length > Self::MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: Self::MAX_PASSWORD_LENGTH,
                actual: length,
            }
            .into());
        }

        Ok(Self { username, password })
    }
}

impl fmt::Debug for SignupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome of a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub tokens: TokenPair,
}

/// Identity carried by a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
}
