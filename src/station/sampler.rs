//! The acquisition and credential-renewal loops.

use crate::error::{Result, StationError};
use crate::shield::WeatherShield;
use crate::station::state::StationState;
use crate::telemetry::relay::Relay;
use crate::telemetry::token::TokenSource;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Timing for the two periodic loops.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    /// How often the acquisition loop fires
    pub sample_interval: Duration,
    /// How often the credential-renewal loop fires
    pub renew_interval: Duration,
    /// Bounded wait for the station gate; on expiry the tick is skipped
    pub gate_timeout: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(crate::DEFAULT_SAMPLE_INTERVAL_SECS),
            renew_interval: Duration::from_secs(crate::DEFAULT_RENEW_INTERVAL_MINS * 60),
            gate_timeout: Duration::from_millis(crate::GATE_TIMEOUT_MS),
        }
    }
}

/// Run the acquisition loop until the shutdown signal flips.
///
/// Each tick runs one [`sample_once`] cycle. A gate timeout is a missed
/// sample, not an error; a sensor failure aborts only the current cycle.
/// On shutdown the timer is simply not rearmed.
pub async fn run_acquisition(
    state: StationState,
    shield: Arc<dyn WeatherShield>,
    relay: Arc<Relay>,
    config: SamplerConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(config.sample_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Acquisition loop started ({}s interval)",
        config.sample_interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        match sample_once(&state, shield.as_ref(), &relay, config.gate_timeout).await {
            Ok(()) => state.count_sample(),
            Err(StationError::LockTimeout) => {
                state.count_skipped_tick();
                debug!("Acquisition tick skipped: gate busy");
            }
            Err(e) => warn!("Acquisition cycle aborted: {}", e),
        }
    }

    info!("Acquisition loop stopped");
}

/// Run a single acquisition cycle.
///
/// Acquires the gate with a bounded wait, pulls fresh values from the
/// shield, publishes them as the current reading and hands the updated
/// snapshot to the relay. The gate is released on every exit path by guard
/// drop, including a sensor failure mid-cycle.
pub async fn sample_once(
    state: &StationState,
    shield: &dyn WeatherShield,
    relay: &Relay,
    gate_timeout: Duration,
) -> Result<()> {
    let mut inner = state.acquire(gate_timeout).await?;

    shield.set_indicator(true).await?;
    let measurements = shield.read_measurements().await?;
    inner.reading.apply(&measurements, Local::now());
    shield.set_indicator(false).await?;

    // The snapshot and the credential for this cycle's sends are captured
    // under the gate; the sends themselves run in the background and do not
    // delay the next tick.
    relay.dispatch(inner.reading.clone(), inner.token.clone(), state.clone());

    Ok(())
}

/// Run the credential-renewal loop until the shutdown signal flips.
pub async fn run_renewal(
    state: StationState,
    source: Arc<dyn TokenSource>,
    config: SamplerConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(config.renew_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first interval tick completes immediately; the initial credential
    // was already minted at startup.
    ticker.tick().await;

    info!(
        "Credential renewal loop started ({}s interval)",
        config.renew_interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        match renew_once(&state, source.as_ref(), config.gate_timeout).await {
            Ok(()) => {
                state.count_renewal();
                debug!("Outbound credential renewed");
            }
            Err(StationError::LockTimeout) => {
                state.count_skipped_renewal();
                debug!("Renewal tick skipped: gate busy");
            }
            Err(e) => warn!("Credential renewal failed: {}", e),
        }
    }

    info!("Credential renewal loop stopped");
}

/// Replace the outbound credential in place under the gate.
pub async fn renew_once(
    state: &StationState,
    source: &dyn TokenSource,
    gate_timeout: Duration,
) -> Result<()> {
    let mut inner = state.acquire(gate_timeout).await?;
    inner.token = source.mint()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shield::{Measurements, SimulatedShield};
    use crate::telemetry::channel::DEFAULT_CATALOG;
    use crate::telemetry::token::{AccessToken, StaticTokenSource};
    use async_trait::async_trait;

    fn test_relay() -> Relay {
        // Sends go nowhere reachable; dispatch outcomes are not asserted here.
        Relay::new("http://127.0.0.1:9/api/messages", DEFAULT_CATALOG.clone()).unwrap()
    }

    struct FailingShield;

    #[async_trait]
    impl WeatherShield for FailingShield {
        async fn initialize(&self) -> Result<()> {
            Ok(())
        }

        async fn read_measurements(&self) -> Result<Measurements> {
            Err(StationError::sensor_error("I2C bus stuck"))
        }

        async fn set_indicator(&self, _on: bool) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cycle_publishes_reading_and_toggles_indicator() {
        let state = StationState::new(AccessToken::new("token"));
        let shield = SimulatedShield::new();
        let relay = test_relay();

        sample_once(&state, &shield, &relay, Duration::from_millis(100))
            .await
            .unwrap();

        let reading = state.snapshot().await;
        assert!(reading.timestamp.is_some());
        assert!(reading.pressure_kpa > 0.0);
        // Indicator driven high then low within the cycle.
        assert!(!shield.indicator());
        assert_eq!(shield.indicator_toggles(), 2);
    }

    #[tokio::test]
    async fn test_held_gate_skips_cycle_without_update() {
        let state = StationState::new(AccessToken::new("token"));
        let shield = SimulatedShield::new();
        let relay = test_relay();

        let guard = state.acquire(Duration::from_millis(100)).await.unwrap();
        let result = sample_once(&state, &shield, &relay, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(StationError::LockTimeout)));
        drop(guard);

        // No partial update, no sensor access.
        assert!(state.snapshot().await.timestamp.is_none());
        assert_eq!(shield.indicator_toggles(), 0);
    }

    #[tokio::test]
    async fn test_sensor_failure_releases_gate() {
        let state = StationState::new(AccessToken::new("token"));
        let relay = test_relay();

        let result = sample_once(&state, &FailingShield, &relay, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(StationError::Sensor(_))));
        assert!(state.snapshot().await.timestamp.is_none());

        // The aborted cycle must not leave the gate held.
        let shield = SimulatedShield::new();
        sample_once(&state, &shield, &relay, Duration::from_millis(100))
            .await
            .unwrap();
        assert!(state.snapshot().await.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_renewal_replaces_token() {
        let state = StationState::new(AccessToken::new("initial"));
        let source = StaticTokenSource::new("renewed");

        renew_once(&state, &source, Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(state.current_token().await.value(), "renewed");
    }

    #[tokio::test]
    async fn test_held_gate_skips_renewal() {
        let state = StationState::new(AccessToken::new("initial"));
        let source = StaticTokenSource::new("renewed");

        let guard = state.acquire(Duration::from_millis(100)).await.unwrap();
        let result = renew_once(&state, &source, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(StationError::LockTimeout)));
        drop(guard);

        assert_eq!(state.current_token().await.value(), "initial");
    }
}
