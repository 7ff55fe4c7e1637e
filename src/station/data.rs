//! The shared weather reading.

use crate::shield::Measurements;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The single most recent sensor snapshot.
///
/// Created zero-valued at process start and overwritten in place by every
/// successful acquisition cycle. All fields of one reading come from the
/// same cycle; partial updates are made impossible by routing every mutation
/// through [`apply`](Reading::apply) under the station gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Local wall-clock time of the last successful sample
    pub timestamp: Option<DateTime<Local>>,
    /// Altitude above sea level in meters
    pub altitude: f64,
    /// Barometric pressure in kilopascal
    pub pressure_kpa: f64,
    /// Ambient temperature in degrees Celsius
    pub temperature_c: f64,
    /// Ambient temperature in degrees Fahrenheit, derived from Celsius
    pub temperature_f: f64,
    /// Relative humidity in percent
    pub humidity_percent: f64,
    /// Outcome of the most recent telemetry send, `None` before the first
    pub last_send_ok: Option<bool>,
}

impl Reading {
    /// Overwrite the whole record with values from one acquisition cycle.
    ///
    /// The Fahrenheit field is derived here and nowhere else, so the two
    /// temperature fields can never disagree.
    pub fn apply(&mut self, measurements: &Measurements, at: DateTime<Local>) {
        self.timestamp = Some(at);
        self.altitude = measurements.altitude_m;
        self.pressure_kpa = measurements.pressure_kpa;
        self.temperature_c = measurements.temperature_c;
        self.temperature_f = fahrenheit(measurements.temperature_c);
        self.humidity_percent = measurements.humidity_percent;
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            timestamp: None,
            altitude: 0.0,
            pressure_kpa: 0.0,
            temperature_c: 0.0,
            temperature_f: fahrenheit(0.0),
            humidity_percent: 0.0,
            last_send_ok: None,
        }
    }
}

/// Convert a Celsius temperature to Fahrenheit.
pub fn fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_derivation() {
        assert_eq!(fahrenheit(0.0), 32.0);
        assert_eq!(fahrenheit(100.0), 212.0);
        assert_eq!(fahrenheit(20.0), 68.0);
        assert_eq!(fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn test_apply_overwrites_whole_record() {
        let mut reading = Reading::default();
        assert!(reading.timestamp.is_none());

        let measurements = Measurements {
            altitude_m: 100.0,
            pressure_kpa: 101.3,
            temperature_c: 20.0,
            humidity_percent: 45.0,
        };
        let now = Local::now();
        reading.apply(&measurements, now);

        assert_eq!(reading.timestamp, Some(now));
        assert_eq!(reading.altitude, 100.0);
        assert_eq!(reading.pressure_kpa, 101.3);
        assert_eq!(reading.temperature_c, 20.0);
        assert_eq!(reading.temperature_f, 68.0);
        assert_eq!(reading.humidity_percent, 45.0);
        // Send outcome belongs to the relay, not the acquisition cycle.
        assert_eq!(reading.last_send_ok, None);
    }

    #[test]
    fn test_reading_serialization() {
        let mut reading = Reading::default();
        reading.apply(
            &Measurements {
                altitude_m: 120.5,
                pressure_kpa: 101.3,
                temperature_c: 21.0,
                humidity_percent: 45.0,
            },
            Local::now(),
        );

        let json = serde_json::to_value(&reading).unwrap();
        assert!(json.get("timestamp").is_some());
        assert_eq!(json["altitude"], 120.5);
        assert_eq!(json["pressure_kpa"], 101.3);
        assert_eq!(json["temperature_c"], 21.0);
        assert_eq!(json["humidity_percent"], 45.0);

        let roundtrip: Reading = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, reading);
    }
}
