use std::sync::Arc;
use std::time::Duration;

use auth::TokenManager;
use axum::http::HeaderValue;
use identity_service::config::Config;
use identity_service::domain::session::ports::AuthSessionServicePort;
use identity_service::domain::session::providers::OAuthProviders;
use identity_service::domain::session::service::AuthSessionService;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::HttpSettings;
use identity_service::outbound::oauth::GoogleProvider;
use identity_service::outbound::repositories::PostgresAccountRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        jwt_issuer = %config.jwt.issuer,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_manager = Arc::new(TokenManager::new(config.jwt.token_settings()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool));

    let mut providers = OAuthProviders::new();
    if let Some(google) = &config.oauth.google {
        providers.register(Arc::new(GoogleProvider::new(google)?));
    }
    tracing::info!(providers = ?providers.names(), "OAuth providers registered");

    let auth_service: Arc<dyn AuthSessionServicePort> = Arc::new(AuthSessionService::new(
        user_repository,
        account_repository,
        token_manager,
        providers,
    ));

    let cors_origin = config
        .server
        .cors_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;

    let http_application = create_router(
        auth_service,
        HttpSettings {
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            secure_cookies: config.server.secure_cookies,
            cors_origin,
        },
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
