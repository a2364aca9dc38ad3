use async_trait::async_trait;
use auth::StoredPassword;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::login::models::NewUser;
use crate::domain::login::models::User;
use crate::domain::login::models::UserId;
use crate::domain::login::models::Username;
use crate::domain::login::ports::CredentialRepository;
use crate::login::errors::LoginError;

pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password_hash: Vec<u8>,
    password_salt: Vec<u8>,
    password_iterations: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = LoginError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let iterations = u32::try_from(row.password_iterations).map_err(|_| {
            LoginError::DatabaseError(format!(
                "User {} has invalid password_iterations {}",
                row.id, row.password_iterations
            ))
        })?;
        let username = Username::new(&row.username).map_err(|e| {
            LoginError::DatabaseError(format!("User {} has invalid username: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            username,
            password: StoredPassword {
                hash: row.password_hash,
                salt: row.password_salt,
                iterations,
            },
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, LoginError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, password_salt, password_iterations, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Credential lookup failed");
            LoginError::DatabaseError(e.to_string())
        })?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, LoginError> {
        let iterations = i32::try_from(user.password.iterations).map_err(|_| {
            LoginError::DatabaseError(format!(
                "Iteration count {} does not fit the store",
                user.password.iterations
            ))
        })?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, password_salt, password_iterations)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, password_salt, password_iterations, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password.hash)
        .bind(&user.password.salt)
        .bind(iterations)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_username_key")
                {
                    return LoginError::UsernameTaken(user.username.as_str().to_string());
                }
            }
            tracing::error!(error = %e, "Failed to insert credential record");
            LoginError::DatabaseError(e.to_string())
        })?;

        User::try_from(row)
    }
}
