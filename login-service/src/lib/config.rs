use std::env;
use std::fmt;

use auth::TokenSettings;
use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

/// Fallback access token lifetime when the setting is absent or unusable.
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;

/// Fallback refresh token lifetime when the setting is absent or unusable.
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

/// Application configuration for login-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// HTTP-level authentication switches.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Expose `POST /api/login/signup`.
    #[serde(default)]
    pub allow_signup: bool,

    /// Mark the refresh cookie `Secure` (disable only for plain-HTTP development).
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
}

fn default_cookie_secure() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_signup: false,
            cookie_secure: default_cookie_secure(),
        }
    }
}

/// Raw token settings as read from files and environment.
///
/// Every field is optional at this stage so that a missing value surfaces
/// as a named [`ConfigurationError`] from [`JwtConfig::token_settings`]
/// rather than a generic deserialization failure.
#[derive(Deserialize, Clone, Default)]
pub struct JwtConfig {
    pub access_key: Option<String>,
    pub refresh_key: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub access_token_expiration_minutes: Option<String>,
    pub refresh_token_expiration_days: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("refresh_key", &self.refresh_key.as_ref().map(|_| "<redacted>"))
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field(
                "access_token_expiration_minutes",
                &self.access_token_expiration_minutes,
            )
            .field(
                "refresh_token_expiration_days",
                &self.refresh_token_expiration_days,
            )
            .finish()
    }
}

/// Unrecoverable token configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Access and refresh tokens must be signed with different keys")]
    SharedSigningKey,
}

impl JwtConfig {
    /// Validate into the settings the token issuer is built from.
    ///
    /// Signing keys, issuer and audience have no default: absent or blank
    /// values are fatal. Lifetimes fall back to [`DEFAULT_ACCESS_TOKEN_MINUTES`]
    /// and [`DEFAULT_REFRESH_TOKEN_DAYS`] with a warning.
    ///
    /// # Errors
    /// * `Missing` - A signing key, the issuer or the audience is absent or blank
    /// * `SharedSigningKey` - Both token kinds would share one key
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigurationError> {
        let access_key = required(&self.access_key, "jwt.access_key")?;
        let refresh_key = required(&self.refresh_key, "jwt.refresh_key")?;
        let issuer = required(&self.issuer, "jwt.issuer")?;
        let audience = required(&self.audience, "jwt.audience")?;

        if access_key == refresh_key {
            return Err(ConfigurationError::SharedSigningKey);
        }

        let access_lifetime = lifetime(
            &self.access_token_expiration_minutes,
            "jwt.access_token_expiration_minutes",
            Duration::minutes(DEFAULT_ACCESS_TOKEN_MINUTES),
            Duration::try_minutes,
        );
        let refresh_lifetime = lifetime(
            &self.refresh_token_expiration_days,
            "jwt.refresh_token_expiration_days",
            Duration::days(DEFAULT_REFRESH_TOKEN_DAYS),
            Duration::try_days,
        );

        Ok(TokenSettings {
            access_key,
            refresh_key,
            issuer,
            audience,
            access_lifetime,
            refresh_lifetime,
        })
    }
}

fn required(value: &Option<String>, setting: &'static str) -> Result<String, ConfigurationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(ConfigurationError::Missing(setting)),
    }
}

fn lifetime(
    value: &Option<String>,
    setting: &'static str,
    default: Duration,
    unit: fn(i64) -> Option<Duration>,
) -> Duration {
    let Some(raw) = value.as_deref().map(str::trim) else {
        tracing::warn!(
            setting,
            default_seconds = default.num_seconds(),
            "Token lifetime not configured, using default"
        );
        return default;
    };

    // The expiry instant must stay representable, or minting would fail on every request
    let parsed = raw
        .parse::<i64>()
        .ok()
        .filter(|v| *v > 0)
        .and_then(unit)
        .filter(|duration| Utc::now().checked_add_signed(*duration).is_some());

    match parsed {
        Some(duration) => duration,
        None => {
            tracing::warn!(
                setting,
                value = raw,
                default_seconds = default.num_seconds(),
                "Token lifetime is not a usable positive number, using default"
            );
            default
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__REFRESH_KEY, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__REFRESH_KEY=... overrides jwt.refresh_key
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
