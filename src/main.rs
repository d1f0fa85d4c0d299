//! Brew Remote - an HTTP server pressing a coffee machine's buttons
//!
//! This is the main entry point for the brew-remote application.

use std::sync::Arc;

use brew_remote::{
    api::create_router,
    config::Config,
    controller::Controller,
    hardware::{DigitalOutput, RecordingOutput, SysfsGpio},
    state::{AppState, BrewLog},
    utils::shutdown_signal,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("brew_remote={},tower_http=info", config.log_level()))
        .init();

    info!("Starting brew-remote server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, data file={}, boot={}s, brew={}s",
          config.host, config.port, config.data_file.display(), config.boot_secs, config.brew_secs);

    let log = BrewLog::open(&config.data_file);

    // Without working outputs no request may be served
    let output: Arc<dyn DigitalOutput> = if config.dry_run {
        warn!("Dry run: output lines are simulated in memory");
        Arc::new(RecordingOutput::new())
    } else {
        match SysfsGpio::open(&config.gpio_root, config.pins()) {
            Ok(gpio) => Arc::new(gpio),
            Err(e) => {
                error!("Failed to open GPIO: {}", e);
                std::process::exit(1);
            }
        }
    };

    let controller = Controller::new(output, log, config.timings());
    controller.announce_startup();

    let state = Arc::new(AppState::new(controller, config.port, config.host.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  /brew/          - Press brew, lock buttons while brewing");
    info!("  /start/         - Press power");
    info!("  /both/          - Press power, wait for boot, then brew");
    info!("  GET /data/data.csv - Brew log");
    info!("  GET /status     - Check current status");
    info!("  GET /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.controller.release_outputs();
    info!("Server shutdown complete");
    Ok(())
}
