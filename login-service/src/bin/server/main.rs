use std::sync::Arc;

use login_service::config::Config;
use login_service::domain::login::service::LoginService;
use login_service::inbound::http::router::create_router;
use login_service::outbound::repositories::PostgresCredentialRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "login_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "login-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // Token settings are checked before any connection is opened
    let token_settings = config.jwt.token_settings().map_err(|e| {
        tracing::error!(error = %e, "Invalid token configuration");
        e
    })?;

    tracing::info!(
        http_port = config.server.http_port,
        allow_signup = config.auth.allow_signup,
        issuer = %token_settings.issuer,
        audience = %token_settings.audience,
        access_lifetime_minutes = token_settings.access_lifetime.num_minutes(),
        refresh_lifetime_days = token_settings.refresh_lifetime.num_days(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let credential_repository = Arc::new(PostgresCredentialRepository::new(pg_pool));
    let login_service = Arc::new(LoginService::new(credential_repository, &token_settings)?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(login_service, &config.auth);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
