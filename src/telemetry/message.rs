//! Per-send telemetry wire messages.

use crate::station::data::Reading;
use crate::telemetry::channel::{Measure, TelemetryChannel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One outbound message, built fresh for every send and discarded after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMessage {
    pub channel_id: Uuid,
    pub measure_name: Measure,
    pub unit: String,
    pub value: f64,
    /// Send time in UTC; independent of the reading's own timestamp
    pub timestamp_utc: DateTime<Utc>,
}

/// Build one message per catalog channel from a reading.
///
/// Every message of one relay invocation carries the same UTC timestamp.
/// The pressure value is scaled by 1/1000, the collector's expected scaling
/// for that channel; all other measures are copied verbatim.
pub fn build_messages(
    catalog: &[TelemetryChannel],
    reading: &Reading,
    timestamp: DateTime<Utc>,
) -> Vec<TelemetryMessage> {
    catalog
        .iter()
        .map(|channel| {
            let value = match channel.measure {
                Measure::Altitude => reading.altitude,
                Measure::Humidity => reading.humidity_percent,
                Measure::Pressure => reading.pressure_kpa / 1000.0,
                Measure::Temperature => reading.temperature_c,
            };

            TelemetryMessage {
                channel_id: channel.channel_id,
                measure_name: channel.measure,
                unit: channel.unit.clone(),
                value,
                timestamp_utc: timestamp,
            }
        })
        .collect()
}
