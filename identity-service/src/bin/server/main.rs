use std::sync::Arc;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::identity::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::cache::RedisSessionCache;
use identity_service::outbound::notifications::HttpConfirmationNotifier;
use identity_service::outbound::repositories::PostgresIdentityRepository;
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
        public_url = %config.server.public_url,
        jwt_algorithm = %config.jwt.algorithm,
        rotate_refresh_tokens = config.jwt.rotate_refresh_tokens,
        session_ttl_seconds = config.redis.ttl_seconds,
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

    let session_cache = Arc::new(RedisSessionCache::new(&config.redis.url).await?);
    tracing::info!(cache = "redis", "Session cache connected");

    let authenticator = Arc::new(Authenticator::new(config.auth_settings()?)?);
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool));
    let notifier = Arc::new(HttpConfirmationNotifier::new(
        config.mail.api_url.clone(),
        config.mail.api_key.clone(),
        config.mail.from.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(
        identity_repository,
        session_cache,
        notifier,
        authenticator,
        config.service_settings(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, &config.server.public_url);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
