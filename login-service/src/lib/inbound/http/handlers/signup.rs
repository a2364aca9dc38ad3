use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::refresh_cookie;
use super::ApiError;
use super::ApiSuccess;
use super::LoginResponseData;
use crate::inbound::http::router::AppState;
use crate::login::models::SignupCommand;

/// Register and log in. Only routed when `auth.allow_signup` is set.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequestBody>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let command = SignupCommand::new(&body.username, body.password)?;

    let user = state.login_service.signup(command).await?;

    let jar = jar.add(refresh_cookie(
        user.tokens.refresh_token.clone(),
        state.cookie_secure,
    ));
    Ok((jar, ApiSuccess::new(StatusCode::CREATED, (&user).into())))
}

#[derive(Clone, Deserialize)]
pub struct SignupRequestBody {
    username: String,
    password: String,
}
