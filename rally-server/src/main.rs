//! Rallyboard Server
//!
//! Live scoreboard for table tennis and other rally-scored racket sports.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use api::scoreboard::BroadcastPort;
use clap::Parser;
use config::file::{StorageBackend, StorageConfig};
use config::{ConfigLoader, get_database_url};
use rally_core::events::match_event_channel;
use rally_core::orchestrator::{MatchEngine, serve_rng};
use rally_core::processors::NotificationDispatcher;
use rally_core::store::{MatchStore, MemoryMatchStore, PostgresMatchStore};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::{AppState, SCORE_BROADCAST_CAPACITY};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Rallyboard - live match scoreboard server
#[derive(Parser, Debug)]
#[command(name = "rally-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./rally-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "RALLY_LOG_JSON", default_value = "false")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_json);

    tracing::info!("Starting rally-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let serve_seed = loaded_config.engine.serve_seed;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Open the match store
    let (store, db_pool) = open_store(&loaded_config.storage, args.migrate).await?;

    // Convert to shared config with separate locks for each section
    let shared_config = loaded_config.into_shared();

    // Event pipeline: engine -> dispatcher -> broadcast -> WebSocket sessions
    let (event_tx, event_rx) = match_event_channel();
    let (score_tx, _) = broadcast::channel(SCORE_BROADCAST_CAPACITY);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let dispatcher = NotificationDispatcher::new(Arc::new(BroadcastPort::new(score_tx.clone())));
    let dispatcher_handle = tokio::spawn(dispatcher.run(shutdown_rx, event_rx));

    let engine = Arc::new(MatchEngine::new(
        store,
        event_tx,
        shared_config.engine.clone(),
        serve_rng(serve_seed),
    ));

    // Create application state
    let state = AppState::new(engine, shared_config, score_tx);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler and the dispatcher to stop
    shutdown_notify.notify_one();
    let _ = shutdown_tx.send(true);
    if let Err(e) = dispatcher_handle.await {
        tracing::error!(error = %e, "NotificationDispatcher task failed");
    }

    // Close database connections gracefully
    if let Some(db_pool) = db_pool {
        tracing::info!("Closing database connections...");
        db_pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Build the configured [`MatchStore`].
///
/// The Postgres pool is returned alongside so it can be closed on shutdown.
async fn open_store(
    storage: &StorageConfig,
    migrate: bool,
) -> anyhow::Result<(Arc<dyn MatchStore>, Option<PgPool>)> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory match store, records are lost on restart");
            Ok((Arc::new(MemoryMatchStore::new()), None))
        }
        StorageBackend::Postgres => {
            // Get database URL from environment
            let database_url = get_database_url().map_err(|e| {
                tracing::error!("DATABASE_URL environment variable not set");
                e
            })?;

            // Create database connection pool
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(storage.max_connections)
                .connect(&database_url)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    e
                })?;
            tracing::info!("Database connection established");

            // Run migrations if requested
            if migrate {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("../migrations")
                    .run(&db_pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to run migrations: {}", e);
                        e
                    })?;
                tracing::info!("Migrations completed successfully");
            }

            Ok((
                Arc::new(PostgresMatchStore::new(db_pool.clone())),
                Some(db_pool),
            ))
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
