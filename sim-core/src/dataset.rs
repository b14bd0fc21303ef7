//! Batch dataset builder
//!
//! Builds the labeled training dataset: for each aircraft in the fleet, one
//! baseline set plus `TOTAL_SAMPLES_PER_AIRCRAFT` samples with monotonically
//! increasing timestamps and a cumulative flight-hours counter. Records are
//! rendered to CSV with a fixed column order that the training pipeline
//! depends on.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use std::path::Path;

use crate::generator::SampleGenerator;
use crate::health::{GenerationMode, Health};
use crate::sample::{round_to, SensorReading};

/// Samples emitted per synthetic aircraft.
pub const TOTAL_SAMPLES_PER_AIRCRAFT: usize = 600;

/// Candidate gaps between consecutive samples, in minutes.
pub const SAMPLING_MINUTES: [i64; 2] = [10, 15];

/// Fixed CSV column order.
pub const CSV_HEADER: &str = "Timestamp,Aircraft_ID,Engine_Model,Flight_Hours,Phase,Throttle,\
RPM,FuelFlow,EGT,OilTemp,OilPressure,Vibration,Severity,Health";

/// The default six-aircraft fleet.
pub fn default_fleet() -> Vec<String> {
    (1..=6).map(|i| format!("HAL-HJT-{i:02}")).collect()
}

/// One row of the training dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRecord {
    #[serde(flatten)]
    pub reading: SensorReading,
    #[serde(rename = "Flight_Hours")]
    pub flight_hours: f64,
    #[serde(rename = "Severity")]
    pub severity: f64,
    #[serde(rename = "Health")]
    pub health: Health,
}

/// Configurable dataset builder.
pub struct DatasetBuilder {
    fleet: Vec<String>,
    samples_per_aircraft: usize,
    start: DateTime<Utc>,
    mode: GenerationMode,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            fleet: default_fleet(),
            samples_per_aircraft: TOTAL_SAMPLES_PER_AIRCRAFT,
            start: Utc::now(),
            mode: GenerationMode::Batch,
        }
    }

    pub fn with_fleet(mut self, fleet: Vec<String>) -> Self {
        self.fleet = fleet;
        self
    }

    pub fn with_samples_per_aircraft(mut self, samples: usize) -> Self {
        self.samples_per_aircraft = samples;
        self
    }

    /// Pin the history start time (timestamps grow from here).
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Override the health table (default batch). Baselines stay per-aircraft
    /// either way.
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the full dataset. Baselines are drawn once per aircraft; every
    /// sample uses the builder's health table.
    pub fn build<R: Rng>(&self, generator: &mut SampleGenerator<R>) -> Vec<DatasetRecord> {
        let mut records = Vec::with_capacity(self.fleet.len() * self.samples_per_aircraft);

        for aircraft_id in &self.fleet {
            let baseline = generator.draw_baseline();
            let mut timestamp = self.start;
            let mut flight_hours = 0.0f64;

            for _ in 0..self.samples_per_aircraft {
                let gap = SAMPLING_MINUTES
                    [generator.rng_mut().gen_range(0..SAMPLING_MINUTES.len())];
                timestamp += Duration::minutes(gap);
                flight_hours += gap as f64 / 60.0;

                let sample = generator.generate_at(&baseline, aircraft_id, self.mode, timestamp);
                records.push(DatasetRecord {
                    reading: sample.reading,
                    flight_hours: round_to(flight_hours, 2),
                    severity: sample.severity,
                    health: sample.health,
                });
            }
        }

        records
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render records as CSV with the fixed column order.
pub fn to_csv(records: &[DatasetRecord]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for r in records {
        csv.push_str(&format!(
            "{},{},{},{:.2},{},{:.2},{:.1},{:.1},{:.1},{:.1},{:.2},{:.2},{:.2},{}\n",
            r.reading.timestamp.to_rfc3339(),
            r.reading.aircraft_id,
            r.reading.engine_model,
            r.flight_hours,
            r.reading.phase,
            r.reading.throttle,
            r.reading.rpm,
            r.reading.fuel_flow,
            r.reading.egt,
            r.reading.oil_temp,
            r.reading.oil_pressure,
            r.reading.vibration,
            r.severity,
            r.health,
        ));
    }
    csv
}

/// Write the rendered CSV to `path` wholesale.
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[DatasetRecord]) -> std::io::Result<()> {
    std::fs::write(path, to_csv(records))
}

/// Empirical health-class frequencies of a record set.
pub fn health_distribution(records: &[DatasetRecord]) -> Vec<(Health, f64)> {
    use crate::health::HEALTH_STATES;
    let n = records.len().max(1) as f64;
    HEALTH_STATES
        .iter()
        .map(|h| {
            let count = records.iter().filter(|r| r.health == *h).count();
            (*h, count as f64 / n)
        })
        .collect()
}
