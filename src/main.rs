//! Pomodoro Widget - a 25-minute countdown timer served to the browser
//! 
//! This is the main entry point for the pomodoro-widget application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use pomodoro_widget::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_widget={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-widget v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Mount the widget
    let state = AppState::mount();

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Widget running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /        - Widget page");
    info!("  POST /start   - Start or restart the countdown");
    info!("  POST /pause   - Pause the countdown");
    info!("  POST /toggle  - Primary button (pause or start)");
    info!("  POST /reset   - Reset to 25:00");
    info!("  GET  /status  - Current timer view");
    info!("  GET  /events  - Server-sent timer updates");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => info!("Shutdown signal {} received", signal),
                Err(e) => error!("Signal handling failed: {}", e),
            }
        }
    }

    // Unmount: no tick may outlive the widget
    if let Err(e) = state.teardown() {
        error!("Failed to tear down widget: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
