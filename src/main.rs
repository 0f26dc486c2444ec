//! Ratio Timer - a study timer that earns break time as you study
//!
//! This is the main entry point for the ratio-timer application.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ratio_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    store::LocalStore,
    tasks::ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("ratio_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting ratio-timer v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.data_dir();
    info!(
        "Configuration: host={}, port={}, data_dir={}",
        config.host,
        config.port,
        data_dir.display()
    );

    let store = LocalStore::open(&data_dir)?;

    // Create application state from whatever was saved last time
    let state = Arc::new(AppState::new(
        store,
        config.sound_player(),
        config.port,
        config.host.clone(),
    ));

    // Start the ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /study/start           - Start studying");
    info!("  POST /study/pause           - Pause or resume study");
    info!("  POST /study/reset[/confirm] - Reset the timer");
    info!("  POST /break/take            - Take the earned break");
    info!("  POST /break/pause           - Pause or resume the break");
    info!("  POST /break/skip            - Skip the rest of the break");
    info!("  POST /shortcut              - Resolve a keyboard shortcut");
    info!("  GET  /sessions              - Recent sessions");
    info!("  POST /sessions/clear[/confirm] - Clear study history");
    info!("  GET  /stats                 - History totals");
    info!("  GET|PUT /settings           - Study ratio and sound");
    info!("  GET  /status                - Current timer snapshot");
    info!("  GET  /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Counters are never persisted, so an interrupted session is gone
    let active = state.current_mode().map(|mode| mode.is_active()).unwrap_or(false);
    if active {
        if let Ok(snapshot) = state.snapshot() {
            warn!(
                "Shutting down while {} at {}; this progress is not saved",
                snapshot.mode, snapshot.clock
            );
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
