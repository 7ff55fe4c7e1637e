//! Web server for the station's local HTTP endpoint.
//!
//! The responder runs for the process lifetime, independent of the two
//! periodic loops; every request reads the current reading through the
//! station's synchronized snapshot accessor.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use handlers::AppState;
pub use router::create_app;

use crate::error::{Result, StationError};
use std::net::SocketAddr;
use tracing::info;

/// Start the web server and serve until the process ends.
pub async fn start_web_server(config: WebConfig, state: AppState) -> Result<()> {
    let app = create_app(&config, state);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| StationError::config_error(format!("invalid bind address: {}", e)))?;

    info!("Starting weathervane web server on http://{}", addr);
    info!("Dashboard available at http://{}/", addr);
    info!("Reading endpoint: http://{}/api/reading", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StationError::web_server_error(format!("failed to bind: {}", e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| StationError::web_server_error(format!("server error: {}", e)))?;

    Ok(())
}
