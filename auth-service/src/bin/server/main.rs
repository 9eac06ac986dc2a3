use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::TokenCodec;
use auth_service::blacklist::service::TokenBlacklist;
use auth_service::config::Config;
use auth_service::domain::session::otp::OtpIssuer;
use auth_service::domain::session::service::AuthService;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::cookies::RefreshCookie;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::notifier::TracingOtpNotifier;
use auth_service::outbound::repositories::PostgresBlacklistRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use auth_service::outbound::scheduler::TokioSweepScheduler;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        access_ttl_minutes = config.jwt.access_ttl_minutes,
        refresh_ttl_minutes = config.jwt.refresh_ttl_minutes,
        otp_ttl_minutes = config.otp.ttl_minutes,
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

    let codec = TokenCodec::with_algorithm(
        config.jwt.access_secret.as_bytes(),
        config.jwt.refresh_secret.as_bytes(),
        &config.jwt.algorithm,
    )?;
    let refresh_ttl = chrono::Duration::minutes(config.jwt.refresh_ttl_minutes);
    let authenticator = Arc::new(Authenticator::new(
        codec,
        chrono::Duration::minutes(config.jwt.access_ttl_minutes),
        refresh_ttl,
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let blacklist = TokenBlacklist::new(Arc::new(PostgresBlacklistRepository::new(pg_pool)));
    let otp_issuer = OtpIssuer::new(
        Arc::clone(&user_repository),
        Arc::new(TracingOtpNotifier::new(config.otp.reveal_codes)),
        Arc::new(TokioSweepScheduler::new()),
        chrono::Duration::minutes(config.otp.ttl_minutes),
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        blacklist.clone(),
        otp_issuer,
        authenticator,
        config.internal.secret_token.clone(),
    ));
    let user_service = Arc::new(UserService::new(user_repository));

    let cleanup_interval = Duration::from_secs(config.blacklist.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cleanup_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = blacklist.purge_expired().await {
                tracing::warn!(error = %e, "Blacklist cleanup failed");
            }
        }
    });
    tracing::info!(
        interval_secs = config.blacklist.cleanup_interval_secs,
        "Blacklist cleanup scheduled"
    );

    let refresh_cookie = RefreshCookie::new(
        config.cookie.refresh_name.clone(),
        config.cookie.secure,
        refresh_ttl,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, user_service, refresh_cookie);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
