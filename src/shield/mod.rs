//! Weather shield access.
//!
//! The sensor hardware is consumed through the [`WeatherShield`] capability:
//! an initialized shield yields altitude, pressure, temperature and humidity
//! and exposes a digital output used as an activity indicator. The
//! `hardware` feature enables the SparkFun shield driver; off the Pi (and in
//! tests) the simulated shield stands in.

pub mod sim;

#[cfg(feature = "hardware")]
pub mod sparkfun;

pub use sim::SimulatedShield;

#[cfg(feature = "hardware")]
pub use sparkfun::SparkfunShield;

use crate::error::Result;
use async_trait::async_trait;

/// One set of values pulled from the shield in a single acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    /// Altitude above sea level in meters
    pub altitude_m: f64,
    /// Barometric pressure in kilopascal
    pub pressure_kpa: f64,
    /// Ambient temperature in degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity in percent
    pub humidity_percent: f64,
}

/// Capability interface to the weather shield.
///
/// Implementations must be safe to share across the sampler, the HTTP
/// responder and the CLI; interior mutability is the implementor's concern.
#[async_trait]
pub trait WeatherShield: Send + Sync {
    /// Bring the shield up. Called once at startup; a failure here prevents
    /// the pipeline from starting.
    async fn initialize(&self) -> Result<()>;

    /// Read all measurement fields in one pass.
    async fn read_measurements(&self) -> Result<Measurements>;

    /// Drive the activity indicator output.
    async fn set_indicator(&self, on: bool) -> Result<()>;
}
