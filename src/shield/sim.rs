//! Simulated weather shield for development off the Pi and for tests.

use crate::error::Result;
use crate::shield::{Measurements, WeatherShield};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A deterministic stand-in for the SparkFun shield.
///
/// Values drift slowly around plausible ambient conditions so the dashboard
/// has something to show; the indicator state and toggle count are
/// observable, which the sampler tests rely on.
pub struct SimulatedShield {
    cycle: AtomicU64,
    indicator: AtomicBool,
    indicator_toggles: AtomicU64,
}

impl SimulatedShield {
    pub fn new() -> Self {
        Self {
            cycle: AtomicU64::new(0),
            indicator: AtomicBool::new(false),
            indicator_toggles: AtomicU64::new(0),
        }
    }

    /// Current state of the activity indicator output.
    pub fn indicator(&self) -> bool {
        self.indicator.load(Ordering::SeqCst)
    }

    /// How many times the indicator has been driven since startup.
    pub fn indicator_toggles(&self) -> u64 {
        self.indicator_toggles.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedShield {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherShield for SimulatedShield {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn read_measurements(&self) -> Result<Measurements> {
        let n = self.cycle.fetch_add(1, Ordering::SeqCst) as f64;
        let wobble = (n / 7.0).sin();

        Ok(Measurements {
            altitude_m: 120.0 + wobble * 0.5,
            pressure_kpa: 101.3 + wobble * 0.2,
            temperature_c: 21.0 + wobble * 1.5,
            humidity_percent: 45.0 + wobble * 3.0,
        })
    }

    async fn set_indicator(&self, on: bool) -> Result<()> {
        self.indicator.store(on, Ordering::SeqCst);
        self.indicator_toggles.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
