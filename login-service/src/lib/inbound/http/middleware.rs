use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that validates access tokens and adds the caller's identity to request extensions
///
/// Every rejection carries the same 401 body as a failed login.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = bearer_token(&req) else {
        tracing::debug!("Request without a usable bearer token");
        return Err(ApiError::invalid_credentials().into_response());
    };

    // Refresh tokens fail here: only the access key is consulted
    let identity = state.login_service.current_user(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        ApiError::invalid_credentials().into_response()
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
