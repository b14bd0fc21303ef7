//! Per-aircraft baselines and the closed-form sensor relations
//!
//! Baselines model engine individuality: the batch builder draws one set per
//! synthetic aircraft and reuses it across that aircraft's whole history,
//! while the live path redraws per call.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Baseline sensor offsets for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineBaseline {
    pub rpm: f64,
    pub egt: f64,
    pub oil_temp: f64,
    pub oil_pressure: f64,
    pub vibration: f64,
    pub fuel: f64,
}

/// Noise-free sensor values before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSensors {
    pub rpm: f64,
    pub egt: f64,
    pub fuel_flow: f64,
    pub oil_temp: f64,
    pub oil_pressure: f64,
    pub vibration: f64,
}

impl EngineBaseline {
    /// Draw a fresh baseline set from the fixed uniform ranges.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            rpm: rng.gen_range(3000.0..3300.0),
            egt: rng.gen_range(500.0..530.0),
            oil_temp: rng.gen_range(58.0..65.0),
            oil_pressure: rng.gen_range(52.0..58.0),
            vibration: rng.gen_range(1.0..1.5),
            fuel: rng.gen_range(470.0..520.0),
        }
    }

    /// Closed-form sensor relations for a given throttle and severity.
    ///
    /// RPM degrades with severity, EGT rises with both load and severity,
    /// oil pressure drops as the fault develops. Noise is applied separately
    /// so this stays exactly testable.
    pub fn sensors_at(&self, throttle: f64, severity: f64) -> RawSensors {
        let rpm = self.rpm * throttle * (1.0 - 0.15 * severity);
        RawSensors {
            rpm,
            egt: self.egt + (rpm / 9000.0) * 320.0 + severity * 120.0,
            fuel_flow: self.fuel + throttle * 850.0 + severity * 100.0,
            oil_temp: self.oil_temp + throttle * 40.0 + severity * 45.0,
            oil_pressure: self.oil_pressure - severity * 25.0,
            vibration: self.vibration + throttle * 0.5 + severity * 3.5,
        }
    }
}
