//! Outbound telemetry: channel catalog, wire messages, the relay and the
//! rotating access credential.

pub mod channel;
pub mod message;
pub mod relay;
pub mod token;

// Re-export commonly used items
pub use channel::{Measure, TelemetryChannel, DEFAULT_CATALOG};
pub use message::{build_messages, TelemetryMessage};
pub use relay::Relay;
pub use token::{AccessToken, StaticTokenSource, TokenSource};
