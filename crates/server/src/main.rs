use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ffjobs_core::{
    load_config, load_config_from_env, validate_config, CommandResolver, Config, HttpFetcher,
    JobLedger, JobOrchestrator, SqliteJobLedger, TokioProcessRunner, WorkspaceManager,
};
use ffjobs_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file used when `FFJOBS_CONFIG` is not set
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

/// Loads the config file if present; an explicitly configured file must exist.
fn load(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                info!("Loading configuration from {:?}", path);
                load_config(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))
            } else {
                info!("No config file found, using defaults and environment");
                load_config_from_env().context("Failed to load config from environment")
            }
        }
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("ffjobs {} starting", VERSION);

    let config = load(std::env::var_os("FFJOBS_CONFIG").map(PathBuf::from))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Resolver strategy: {}", config.resolver.strategy);

    // Create SQLite job ledger
    let ledger: Arc<dyn JobLedger> = Arc::new(
        SqliteJobLedger::new(&config.database.path).context("Failed to create job ledger")?,
    );
    info!("Job ledger initialized");

    let workspaces = Arc::new(
        WorkspaceManager::new(&config.workspace).context("Failed to resolve workspace roots")?,
    );
    info!(
        "Workspace roots: staging {:?}, output {:?}",
        workspaces.staging_root(),
        workspaces.output_root()
    );

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher).context("Failed to create fetcher")?);

    let orchestrator = JobOrchestrator::new(
        &config.orchestrator,
        ledger,
        workspaces,
        fetcher,
        Arc::new(CommandResolver::new(config.resolver.clone())),
        Arc::new(TokioProcessRunner::new(config.runner.clone())),
    );
    match config.orchestrator.max_concurrent_jobs {
        Some(limit) => info!("Job orchestrator ready (max {} concurrent jobs)", limit),
        None => info!("Job orchestrator ready (no concurrency limit)"),
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), orchestrator));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
