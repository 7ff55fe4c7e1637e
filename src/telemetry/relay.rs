//! The telemetry relay: one reading in, one message per channel out.

use crate::error::{Result, StationError};
use crate::station::data::Reading;
use crate::station::state::StationState;
use crate::telemetry::channel::TelemetryChannel;
use crate::telemetry::message::{build_messages, TelemetryMessage};
use crate::telemetry::token::AccessToken;
use chrono::Utc;
use futures_util::future;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Relays readings to the remote collector.
///
/// Each dispatched reading becomes one independently-addressed message per
/// catalog channel. Sends are concurrent and unordered; a failed send is
/// recorded and lost, never retried, since the next cycle produces a fresh
/// reading anyway.
pub struct Relay {
    client: reqwest::Client,
    collector_url: String,
    catalog: Vec<TelemetryChannel>,
}

impl Relay {
    /// Create a relay for the given collector endpoint and channel catalog.
    pub fn new(collector_url: impl Into<String>, catalog: Vec<TelemetryChannel>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StationError::telemetry_error(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collector_url: collector_url.into(),
            catalog,
        })
    }

    /// Send one reading to the collector in the background.
    ///
    /// Messages and the credential are captured synchronously, so the caller
    /// may still hold the station gate; the sends themselves run on a
    /// spawned task and never block the acquisition loop. Outcomes are
    /// written back through `state` as each send completes. The returned
    /// handle is dropped by the sampler (shutdown abandons in-flight sends);
    /// tests await it.
    pub fn dispatch(
        &self,
        reading: Reading,
        token: AccessToken,
        state: StationState,
    ) -> JoinHandle<()> {
        let messages = build_messages(&self.catalog, &reading, Utc::now());
        let client = self.client.clone();
        let url = self.collector_url.clone();

        tokio::spawn(async move {
            let sends = messages
                .into_iter()
                .map(|message| send_message(&client, &url, &token, message));

            for outcome in future::join_all(sends).await {
                if let Err(e) = &outcome {
                    warn!("Telemetry send failed: {}", e);
                } else {
                    debug!("Telemetry message delivered");
                }
                state.record_send_outcome(outcome.is_ok()).await;
            }
        })
    }
}

/// POST a single message to the collector.
///
/// Serialization failure is fatal for this message only; sibling sends are
/// unaffected either way.
async fn send_message(
    client: &reqwest::Client,
    url: &str,
    token: &AccessToken,
    message: TelemetryMessage,
) -> Result<()> {
    let body = serde_json::to_vec(&message)?;

    let response = client
        .post(url)
        .header(AUTHORIZATION, token.value())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| StationError::telemetry_error(format!("send failed: {}", e)))?;

    response
        .error_for_status()
        .map_err(|e| StationError::telemetry_error(format!("collector rejected message: {}", e)))?;

    Ok(())
}
