use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use rand::Rng;
use serde::Deserialize;

use super::refresh_cookie;
use super::ApiError;
use super::ApiSuccess;
use super::LoginResponseData;
use crate::inbound::http::router::AppState;
use crate::login::models::LoginCommand;

const MIN_FAILURE_DELAY_MS: u64 = 50;
const MAX_FAILURE_DELAY_MS: u64 = 150;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let command = LoginCommand::new(body.username, body.password);

    match state.login_service.login(command).await {
        Ok(user) => {
            let jar = jar.add(refresh_cookie(
                user.tokens.refresh_token.clone(),
                state.cookie_secure,
            ));
            Ok((jar, ApiSuccess::new(StatusCode::OK, (&user).into())))
        }
        Err(e) => {
            tokio::time::sleep(failure_delay()).await;
            Err(ApiError::from(e))
        }
    }
}

/// Random pause applied before any failed login response.
pub(crate) fn failure_delay() -> Duration {
    let millis = rand::thread_rng().gen_range(MIN_FAILURE_DELAY_MS..=MAX_FAILURE_DELAY_MS);
    Duration::from_millis(millis)
}

#[derive(Clone, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_delay_bounds() {
        for _ in 0..200 {
            let delay = failure_delay();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(150));
        }
    }
}
