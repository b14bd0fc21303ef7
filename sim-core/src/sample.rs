//! Sample data structures
//!
//! `SensorReading` is the caller-visible part of a sample; field names are
//! pinned to the dataset column names so the JSON wire format and the CSV
//! agree. `LabeledSample` additionally carries the latent label and is never
//! serialized whole on the live path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::Health;
use crate::phase::Phase;

/// One engine telemetry reading, as exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Aircraft_ID")]
    pub aircraft_id: String,
    #[serde(rename = "Engine_Model")]
    pub engine_model: String,
    #[serde(rename = "Phase")]
    pub phase: Phase,
    #[serde(rename = "Throttle")]
    pub throttle: f64,
    #[serde(rename = "RPM")]
    pub rpm: f64,
    #[serde(rename = "FuelFlow")]
    pub fuel_flow: f64,
    #[serde(rename = "EGT")]
    pub egt: f64,
    #[serde(rename = "OilTemp")]
    pub oil_temp: f64,
    #[serde(rename = "OilPressure")]
    pub oil_pressure: f64,
    #[serde(rename = "Vibration")]
    pub vibration: f64,
}

impl SensorReading {
    /// True when every sensor field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.throttle,
            self.rpm,
            self.fuel_flow,
            self.egt,
            self.oil_temp,
            self.oil_pressure,
            self.vibration,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// A generated sample together with its latent ground truth.
///
/// Constructed fresh per generation call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub reading: SensorReading,
    pub health: Health,
    pub severity: f64,
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
