use std::net::SocketAddr;
use std::sync::Arc;

use threesixty_db::{AuditSink, InMemoryStore, NotificationStore, PgAuditSink, PgNotificationStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threesixty_api::auth::JwtIdentityProvider;
use threesixty_api::config::ServerConfig;
use threesixty_api::router::build_app_router;
use threesixty_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threesixty_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        app_origin = %config.app_origin,
        "Loaded server configuration"
    );

    // --- Storage ---
    let (store, audit): (Arc<dyn NotificationStore>, Arc<dyn AuditSink>) =
        match config.database_url.as_deref() {
            Some(database_url) => {
                let pool = threesixty_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                threesixty_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");
                tracing::info!("Database health check passed");

                threesixty_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                let store: Arc<dyn NotificationStore> =
                    Arc::new(PgNotificationStore::new(pool.clone()));
                let audit: Arc<dyn AuditSink> = Arc::new(PgAuditSink::new(pool));
                (store, audit)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store; data is not persisted");
                let memory = Arc::new(InMemoryStore::new());
                let store: Arc<dyn NotificationStore> = memory.clone();
                let audit: Arc<dyn AuditSink> = memory;
                (store, audit)
            }
        };

    // --- App state ---
    let identity = Arc::new(JwtIdentityProvider::new(config.jwt.clone()));
    let state = AppState::new(config.clone(), store, audit, identity);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
