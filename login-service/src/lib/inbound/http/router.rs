use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::signup::signup;
use super::middleware::authenticate as auth_middleware;
use crate::config::AuthConfig;
use crate::domain::login::ports::LoginServicePort;

#[derive(Clone)]
pub struct AppState {
    pub login_service: Arc<dyn LoginServicePort>,
    pub cookie_secure: bool,
}

pub fn create_router(login_service: Arc<dyn LoginServicePort>, auth: &AuthConfig) -> Router {
    let state = AppState {
        login_service,
        cookie_secure: auth.cookie_secure,
    };

    let mut public_routes = Router::new()
        .route("/api/login/login", post(login))
        .route("/api/login/refresh", post(refresh));

    if auth.allow_signup {
        public_routes = public_routes.route("/api/login/signup", post(signup));
    }

    let protected_routes = Router::new()
        .route("/api/login/logout", post(logout))
        .route("/api/login/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens and the refresh cookie
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
