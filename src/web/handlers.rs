//! HTTP handlers for API endpoints.

use crate::shield::WeatherShield;
use crate::station::data::Reading;
use crate::station::state::StationState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::error;

/// Shared handler state: the station container plus the shield capability
/// for control endpoints.
#[derive(Clone)]
pub struct AppState {
    pub station: StationState,
    pub shield: Arc<dyn WeatherShield>,
}

/// Get the current reading as JSON.
pub async fn get_reading(State(state): State<AppState>) -> Json<Reading> {
    Json(state.station.snapshot().await)
}

/// Health check endpoint with tick accounting.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.station.stats();

    Json(json!({
        "status": "ok",
        "service": "weathervane",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "samples": stats.samples.load(Ordering::Relaxed),
        "skipped_ticks": stats.skipped_ticks.load(Ordering::Relaxed),
        "renewals": stats.renewals.load(Ordering::Relaxed),
        "skipped_renewals": stats.skipped_renewals.load(Ordering::Relaxed),
    }))
}

#[derive(Debug, Deserialize)]
pub struct IndicatorRequest {
    pub on: bool,
}

/// Drive the shield's activity indicator from a local client.
pub async fn set_indicator(
    State(state): State<AppState>,
    Json(request): Json<IndicatorRequest>,
) -> Result<StatusCode, StatusCode> {
    match state.shield.set_indicator(request.on).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to drive indicator: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Serve the dashboard HTML page from static files.
pub async fn serve_index() -> Result<Html<String>, StatusCode> {
    match tokio::fs::read_to_string("static/index.html").await {
        Ok(content) => Ok(Html(content)),
        Err(e) => {
            error!("Failed to read index.html: {}", e);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Serve the built-in dashboard when no static files are available.
pub async fn default_index() -> Html<&'static str> {
    Html(DEFAULT_INDEX_HTML)
}

/// Built-in dashboard: polls the reading endpoint every two seconds.
const DEFAULT_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Weathervane</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #3a7bd5 0%, #00d2ff 100%);
            color: #333;
            min-height: 100vh;
            padding: 20px;
        }

        .container { max-width: 700px; margin: 0 auto; }

        .header { text-align: center; margin-bottom: 30px; color: white; }
        .header h1 { font-size: 2.5rem; text-shadow: 1px 1px 3px rgba(0,0,0,0.3); }

        .card {
            background: white;
            border-radius: 12px;
            padding: 25px;
            box-shadow: 0 8px 24px rgba(0,0,0,0.12);
        }

        .metric {
            display: flex;
            justify-content: space-between;
            padding: 12px 0;
            border-bottom: 1px solid #eee;
        }
        .metric:last-child { border-bottom: none; }
        .metric-label { font-weight: 600; color: #666; }
        .metric-value { font-weight: bold; color: #333; }

        .status { text-align: center; color: white; margin-top: 20px; opacity: 0.9; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Weathervane</h1>
            <p>Raspberry Pi Weather Station</p>
        </div>

        <div class="card">
            <div class="metric"><span class="metric-label">Temperature</span>
                <span class="metric-value" id="temperature">-</span></div>
            <div class="metric"><span class="metric-label">Humidity</span>
                <span class="metric-value" id="humidity">-</span></div>
            <div class="metric"><span class="metric-label">Pressure</span>
                <span class="metric-value" id="pressure">-</span></div>
            <div class="metric"><span class="metric-label">Altitude</span>
                <span class="metric-value" id="altitude">-</span></div>
            <div class="metric"><span class="metric-label">Last sample</span>
                <span class="metric-value" id="timestamp">-</span></div>
            <div class="metric"><span class="metric-label">Last cloud send</span>
                <span class="metric-value" id="send">-</span></div>
        </div>

        <div class="status" id="status">Connecting...</div>
    </div>

    <script>
        async function refresh() {
            try {
                const response = await fetch('/api/reading');
                const r = await response.json();

                document.getElementById('temperature').textContent =
                    `${r.temperature_c.toFixed(1)} °C / ${r.temperature_f.toFixed(1)} °F`;
                document.getElementById('humidity').textContent =
                    `${r.humidity_percent.toFixed(1)} %RH`;
                document.getElementById('pressure').textContent =
                    `${r.pressure_kpa.toFixed(2)} kPa`;
                document.getElementById('altitude').textContent =
                    `${r.altitude.toFixed(1)} m`;
                document.getElementById('timestamp').textContent =
                    r.timestamp ? new Date(r.timestamp).toLocaleTimeString() : 'waiting';
                document.getElementById('send').textContent =
                    r.last_send_ok === null ? 'pending' : (r.last_send_ok ? 'ok' : 'failed');

                document.getElementById('status').textContent = 'Live';
            } catch (e) {
                document.getElementById('status').textContent = 'Disconnected';
            }
        }

        refresh();
        setInterval(refresh, 2000);
    </script>
</body>
</html>"#;
