//! Court Warmup - A multi-court warmup countdown server
//!
//! This is the main entry point for the court-warmup application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use court_warmup::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{court_announcer_task, TickDriver},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("court_warmup={},tower_http=info", config.log_level()))
        .init();

    let initial = config.initial_settings();
    info!("Starting court-warmup server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, courts={}, warmup={}min, tick={}ms",
          config.host, config.port, initial.court_count, initial.warmup_minutes, config.tick_ms);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        initial,
        config.default_settings(),
    ));

    // Start the background tasks
    let ticker = TickDriver::new(Arc::clone(&state), config.tick_period()).start();
    let announcer_state = Arc::clone(&state);
    tokio::spawn(async move {
        court_announcer_task(announcer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /courts                - List courts");
    info!("  GET  /courts/:index         - Show one court");
    info!("  POST /courts/:index/toggle  - Pause, continue or clear the timer");
    info!("  POST /courts/:index/shuttles - Change the shuttle count");
    info!("  POST /courts/:index/reset   - Start a fresh warmup");
    info!("  GET  /settings              - Show settings");
    info!("  POST /settings              - Apply courtCount/warmupTime query");
    info!("  GET  /status                - Check current status");
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

    ticker.stop().await;
    info!("Server shutdown complete");
    Ok(())
}
