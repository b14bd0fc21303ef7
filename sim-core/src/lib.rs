//! AeroPulse simulation core
//!
//! Synthetic engine-telemetry generation for the AeroPulse predictive
//! maintenance demo. One call produces one physics-inspired sensor reading
//! for an Adour-class turbofan, driven by a latent health state and an
//! operating phase drawn from fixed categorical tables.
//!
//! The crate has two consumers:
//! - the `generate-dataset` binary, which builds the labeled training CSV
//!   (baselines drawn once per aircraft), and
//! - the dashboard backend, which samples one live reading per request
//!   (baselines redrawn every call) and never exposes the latent label.

pub mod baseline;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod health;
pub mod phase;
pub mod sample;

pub use baseline::{EngineBaseline, RawSensors};
pub use error::SimError;
pub use generator::SampleGenerator;
pub use health::{GenerationMode, Health};
pub use phase::Phase;
pub use sample::{LabeledSample, SensorReading};

/// Aircraft identifier used when the caller does not supply one.
pub const DEFAULT_AIRCRAFT_ID: &str = "HAL-HJT-01";

/// Engine model stamped on every sample.
pub const ENGINE_MODEL: &str = "Adour Mk-821";
