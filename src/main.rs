//! CampusConnect server
//!
//! Main application entry point: serves the trusted query endpoint over
//! the shared data-access layer.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use campus_connect::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers::{self, AppState},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer flushing.
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting CampusConnect server...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool = connection::create_pool(&settings.database).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let database = DatabaseService::new(pool.clone());
    let services = ServiceFactory::new(database, &settings)?;

    let state = AppState {
        auth: services.auth.clone(),
        events: Arc::new(services.events.clone()),
    };
    let app = handlers::router(state).merge(handlers::health::router(pool));

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&address).await?;
    info!("CampusConnect listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("CampusConnect server has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
