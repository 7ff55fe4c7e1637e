//! The fixed telemetry channel catalog.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// The closed set of measures the collector understands.
///
/// The catalog is keyed by measure, so a "lookup miss" cannot occur at all:
/// a catalog that simply lacks a channel for some measure produces no
/// message for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    Altitude,
    Humidity,
    Pressure,
    Temperature,
}

/// One named, unit-tagged telemetry stream, immutable for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryChannel {
    /// Collector-side identifier for this stream
    pub channel_id: Uuid,
    /// Which reading field feeds this channel
    pub measure: Measure,
    /// Unit tag sent with every message
    pub unit: String,
}

impl TelemetryChannel {
    pub fn new(channel_id: Uuid, measure: Measure, unit: impl Into<String>) -> Self {
        Self {
            channel_id,
            measure,
            unit: unit.into(),
        }
    }
}

lazy_static::lazy_static! {
    /// The channels registered with the collector for this station.
    pub static ref DEFAULT_CATALOG: Vec<TelemetryChannel> = vec![
        TelemetryChannel::new(
            uuid!("2298a348-e2f9-4438-ab23-82a3930662ab"),
            Measure::Altitude,
            "m",
        ),
        TelemetryChannel::new(
            uuid!("2298a348-e2f9-4438-ab23-82a3930662ac"),
            Measure::Humidity,
            "%RH",
        ),
        TelemetryChannel::new(
            uuid!("2298a348-e2f9-4438-ab23-82a3930662ad"),
            Measure::Pressure,
            "kPa",
        ),
        TelemetryChannel::new(
            uuid!("2298a348-e2f9-4438-ab23-82a3930662ae"),
            Measure::Temperature,
            "C",
        ),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_covers_all_measures() {
        let measures: HashSet<Measure> = DEFAULT_CATALOG.iter().map(|c| c.measure).collect();
        assert_eq!(DEFAULT_CATALOG.len(), 4);
        assert!(measures.contains(&Measure::Altitude));
        assert!(measures.contains(&Measure::Humidity));
        assert!(measures.contains(&Measure::Pressure));
        assert!(measures.contains(&Measure::Temperature));
    }

    #[test]
    fn test_channel_ids_are_unique() {
        let ids: HashSet<Uuid> = DEFAULT_CATALOG.iter().map(|c| c.channel_id).collect();
        assert_eq!(ids.len(), DEFAULT_CATALOG.len());
    }

    #[test]
    fn test_custom_channel_construction() {
        let id = Uuid::new_v4();
        let channel = TelemetryChannel::new(id, Measure::Temperature, "F");
        assert_eq!(channel.channel_id, id);
        assert_eq!(channel.measure, Measure::Temperature);
        assert_eq!(channel.unit, "F");
    }

    #[test]
    fn test_measure_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&Measure::Temperature).unwrap(),
            "\"Temperature\""
        );
    }
}
