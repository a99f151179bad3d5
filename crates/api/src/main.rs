use std::net::SocketAddr;
use std::sync::Arc;

use bookings_db::store::PgStore;
use bookings_events::{EmailConfig, EmailDelivery, LogTransport, MailDispatcher, MailTransport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookings_api::config::ServerConfig;
use bookings_api::router::build_app_router;
use bookings_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bookings_api=debug,bookings_db=debug,bookings_events=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = bookings_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    bookings_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    bookings_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store = Arc::new(PgStore::new(pool, config.db_query_timeout()));

    // --- Mail ---
    let transport: Arc<dyn MailTransport> = match EmailConfig::from_env() {
        Some(email) => {
            tracing::info!(host = %email.smtp_host, port = email.smtp_port, "Sending mail over SMTP");
            Arc::new(EmailDelivery::new(email, config.email_templates_dir.clone()))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, notifications will only be logged");
            Arc::new(LogTransport)
        }
    };
    let (mailer, mut mail_worker) = MailDispatcher::spawn(config.mail_queue_capacity, transport);
    tracing::info!(capacity = config.mail_queue_capacity, "Mail dispatcher started");

    // --- App state ---
    let state = AppState::new(config.clone(), store, mailer);
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining mail queue");

    // The router (and every dispatcher handle in its state) is gone, so the
    // worker finishes once the queue is empty.
    match tokio::time::timeout(config.shutdown_timeout(), &mut mail_worker).await {
        Ok(Ok(delivered)) => tracing::info!(delivered, "Mail queue drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Mail worker failed"),
        Err(_) => {
            mail_worker.abort();
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Mail queue not drained in time, discarding remaining messages"
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
