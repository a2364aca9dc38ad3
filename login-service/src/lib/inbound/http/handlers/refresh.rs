use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new access token.
///
/// The cookie wins when both a cookie and a body are sent.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequestBody>>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| body.and_then(|Json(body)| body.refresh_token))
        .filter(|token| !token.is_empty())
        .ok_or_else(ApiError::invalid_credentials)?;

    let token = state
        .login_service
        .refresh(&refresh_token)
        .await
        .ok_or_else(ApiError::invalid_credentials)?;

    Ok(ApiSuccess::new(StatusCode::OK, RefreshResponseData { token }))
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequestBody {
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub token: String,
}
