//! Web application router and middleware setup.

use crate::web::config::WebConfig;
use crate::web::handlers::{self, AppState};
use axum::{
    routing::{get, get_service, post},
    Router,
};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/reading", get(handlers::get_reading))
        .route("/api/health", get(handlers::health_check))
        .route("/api/indicator", post(handlers::set_indicator));

    // Add static file serving if a path is configured
    if let Some(static_path) = &config.static_path {
        let static_path = PathBuf::from(static_path);

        if static_path.exists() {
            info!("Serving static files from: {:?}", static_path);
            app = app.nest_service("/static", get_service(ServeDir::new(&static_path)));

            let index_file = static_path.join("index.html");
            if index_file.exists() {
                app = app.route("/", get(handlers::serve_index));
            } else {
                app = app.route("/", get(handlers::default_index));
            }
        } else {
            tracing::warn!(
                "Static path {:?} does not exist, serving built-in dashboard",
                static_path
            );
            app = app.route("/", get(handlers::default_index));
        }
    } else {
        app = app.route("/", get(handlers::default_index));
    }

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
