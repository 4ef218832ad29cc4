use std::sync::Arc;

use chrono::Duration;
use identity_service::access::AccessGate;
use identity_service::config::Config;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::ports::UserServicePort;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use identity_service::outbound::security::Argon2CredentialHasher;
use identity_service::outbound::security::JwtTokenIssuer;
use sqlx::postgres::PgConnectOptions;
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
        database_name = %config.database.name,
        in_memory = config.database.in_memory,
        http_address = %config.http_address(),
        token_ttl_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let hasher = Arc::new(Argon2CredentialHasher::new());
    let tokens = Arc::new(JwtTokenIssuer::new(
        config.jwt.secret.as_bytes(),
        Duration::hours(config.jwt.expiration_hours),
    ));

    let user_service: Arc<dyn UserServicePort> = if config.database.in_memory {
        tracing::warn!("Using in-memory user store, data is lost on shutdown");
        build_user_service(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&hasher),
            Arc::clone(&tokens),
        )
    } else {
        let repository = connect_postgres(&config).await?;
        build_user_service(Arc::new(repository), Arc::clone(&hasher), Arc::clone(&tokens))
    };

    let gate = Arc::new(AccessGate::new(Arc::clone(&user_service), tokens.clone()));

    let http_address = config.http_address();
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(user_service, gate))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

fn build_user_service<UR>(
    repository: Arc<UR>,
    hasher: Arc<Argon2CredentialHasher>,
    tokens: Arc<JwtTokenIssuer>,
) -> Arc<dyn UserServicePort>
where
    UR: UserRepository,
{
    Arc::new(UserService::new(repository, hasher, tokens))
}

async fn connect_postgres(config: &Config) -> Result<PostgresUserRepository, anyhow::Error> {
    let options = config
        .database
        .url
        .parse::<PgConnectOptions>()?
        .database(&config.database.name);

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    Ok(PostgresUserRepository::new(pg_pool))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
