//! Authentication utilities library
//!
//! Provides the building blocks of the login service:
//! - Password hashing (PBKDF2-HMAC-SHA256, per-record salt and work factor)
//! - JWT token generation and validation (HS256, issuer/audience checked)
//! - Access/refresh token issuance with distinct signing keys
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_iterations(1_000);
//! let stored = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &stored).unwrap());
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{TokenIssuer, TokenSettings};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(&TokenSettings {
//!     access_key: "access_key_at_least_32_bytes_long!!".to_string(),
//!     refresh_key: "refresh_key_at_least_32_bytes_long!".to_string(),
//!     issuer: "portfolio-api".to_string(),
//!     audience: "portfolio-web".to_string(),
//!     access_lifetime: Duration::minutes(30),
//!     refresh_lifetime: Duration::days(7),
//! });
//!
//! let pair = issuer.issue_token_pair(1, "alice").unwrap();
//! let claims = issuer.validate_access_token(&pair.access_token).unwrap();
//! assert_eq!(claims.name, "alice");
//! assert!(issuer.validate_access_token(&pair.refresh_token).is_err());
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::TokenIssuer;
pub use issuer::TokenKind;
pub use issuer::TokenPair;
pub use issuer::TokenSettings;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::StoredPassword;
