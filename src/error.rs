//! Error handling for the weathervane crate.

/// A specialized `Result` type for weather station operations.
pub type Result<T> = std::result::Result<T, StationError>;

/// The main error type for weather station operations.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The station gate was not acquired within the bounded wait
    #[error("station gate not acquired within the timeout")]
    LockTimeout,

    /// Sensor shield access failed
    #[error("sensor error: {0}")]
    Sensor(String),

    /// Outbound telemetry send failed
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Message serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Web server error
    #[error("web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl StationError {
    /// Create a new sensor error
    pub fn sensor_error(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }

    /// Create a new telemetry error
    pub fn telemetry_error(msg: impl Into<String>) -> Self {
        Self::Telemetry(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
