//! # Weathervane - Raspberry Pi Weather Station
//!
//! A small Rust service for a Raspberry Pi weather shield: it samples
//! altitude, pressure, temperature and humidity on a fixed interval, keeps
//! the latest reading as shared state, serves it over a local HTTP endpoint,
//! and relays every reading to a remote telemetry collector under a rotating
//! access credential.
//!
//! ## Features
//!
//! - **Periodic acquisition**: timer-driven sampling behind a bounded-wait
//!   gate, so a contended cycle is skipped rather than piled up
//! - **Web dashboard**: live reading and health endpoints via axum
//! - **Cloud relay**: one JSON message per telemetry channel per cycle
//! - **Credential rotation**: the outbound access token is renewed on its
//!   own timer, serialized against in-cycle sends
//! - **Library + Binary**: use as a crate or standalone application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weathervane::{
//!     AccessToken, Relay, SamplerConfig, SimulatedShield, StationState, DEFAULT_CATALOG,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shield = Arc::new(SimulatedShield::new());
//!     let state = StationState::new(AccessToken::new("demo-token"));
//!     let relay = Arc::new(Relay::new(
//!         "http://localhost:8088/api/messages",
//!         DEFAULT_CATALOG.clone(),
//!     )?);
//!
//!     let (_shutdown, rx) = tokio::sync::watch::channel(false);
//!     weathervane::run_acquisition(state, shield, relay, SamplerConfig::default(), rx).await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod shield;
pub mod station;
pub mod telemetry;
pub mod web;

// Re-export public API
pub use error::{Result, StationError};
pub use shield::{Measurements, SimulatedShield, WeatherShield};
pub use station::{
    data::Reading,
    sampler::{run_acquisition, run_renewal, sample_once, SamplerConfig},
    state::StationState,
};
pub use telemetry::{
    channel::{Measure, TelemetryChannel, DEFAULT_CATALOG},
    message::TelemetryMessage,
    relay::Relay,
    token::{AccessToken, StaticTokenSource, TokenSource},
};
pub use web::{create_app, start_web_server, AppState, WebConfig};

/// The default sensor sampling interval in seconds
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 2;

/// The default access-credential renewal interval in minutes
pub const DEFAULT_RENEW_INTERVAL_MINS: u64 = 15;

/// How long a periodic loop waits for the station gate before skipping a tick
pub const GATE_TIMEOUT_MS: u64 = 1_000;

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 50001;
