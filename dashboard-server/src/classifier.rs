//! Engine health classifier
//!
//! The classifier is an externally trained, opaque coefficient bundle: a
//! JSON file holding the class list, feature layout, standard-scaler
//! parameters and the per-class weight rows of a linear model. Inference is
//! standardize -> affine -> softmax; nothing here trains anything.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use aeropulse_sim::{Health, Phase, SensorReading};

/// Feature order the bundle must declare, matching the training pipeline.
pub const FEATURE_LAYOUT: [&str; 12] = [
    "Flight_Hours",
    "Throttle",
    "RPM",
    "FuelFlow",
    "EGT",
    "OilTemp",
    "OilPressure",
    "Vibration",
    "Phase_CRUISE",
    "Phase_DESCENT",
    "Phase_IDLE",
    "Phase_TAKEOFF",
];

pub const FEATURE_COUNT: usize = FEATURE_LAYOUT.len();

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Standard-scaler parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// Serialized model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model_type: String,
    pub classes: Vec<Health>,
    pub features: Vec<String>,
    pub scaler: ScalerParams,
    /// One weight row per class, one column per feature.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Metadata about the currently loaded bundle.
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub classes: Vec<Health>,
    pub loaded_at: DateTime<Utc>,
}

/// Prediction output
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: Health,
    pub probabilities: BTreeMap<String, f64>,
    pub inference_time_us: u64,
}

/// Engine status for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_type: Option<String>,
    pub model_path: Option<String>,
    pub avg_latency_ms: f64,
    pub inference_count: u64,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct ClassifierError(pub String);

impl std::fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassifierError: {}", self.0)
    }
}

impl std::error::Error for ClassifierError {}

// ============================================================================
// ENGINE
// ============================================================================

/// Holds the loaded bundle plus inference metrics.
pub struct ClassifierEngine {
    bundle: RwLock<Option<(ModelBundle, ModelMetadata)>>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl ClassifierEngine {
    pub fn new() -> Self {
        Self {
            bundle: RwLock::new(None),
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Load and validate a bundle from a JSON file.
    pub fn load_from_file(&self, path: &str) -> Result<(), ClassifierError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError(format!("Failed to read {path}: {e}")))?;
        let bundle: ModelBundle = serde_json::from_str(&content)
            .map_err(|e| ClassifierError(format!("Failed to parse {path}: {e}")))?;
        self.install(bundle, path)
    }

    /// Validate and install a bundle (also used by tests).
    pub fn install(&self, bundle: ModelBundle, path: &str) -> Result<(), ClassifierError> {
        validate_bundle(&bundle)?;
        let metadata = ModelMetadata {
            model_path: path.to_string(),
            model_type: bundle.model_type.clone(),
            classes: bundle.classes.clone(),
            loaded_at: Utc::now(),
        };
        tracing::info!("Loaded {} model from {} ({} classes)",
            bundle.model_type, path, bundle.classes.len());
        *self.bundle.write() = Some((bundle, metadata));
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.read().is_some()
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        self.bundle.read().as_ref().map(|(_, m)| m.clone())
    }

    /// Run inference over an aligned feature vector. Returns `None` when no
    /// bundle is loaded.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Option<Prediction> {
        let start = std::time::Instant::now();
        let guard = self.bundle.read();
        let (bundle, _) = guard.as_ref()?;

        // Standardize, then affine transform per class.
        let mut scaled = [0.0f64; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let std = bundle.scaler.std[i].max(1e-8);
            scaled[i] = (features[i] - bundle.scaler.mean[i]) / std;
        }

        let logits: Vec<f64> = bundle
            .weights
            .iter()
            .zip(bundle.bias.iter())
            .map(|(row, b)| row.iter().zip(scaled.iter()).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();

        let probs = softmax(&logits);
        let best = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)?;

        let probabilities: BTreeMap<String, f64> = bundle
            .classes
            .iter()
            .zip(probs.iter())
            .map(|(class, p)| (class.as_str().to_string(), *p))
            .collect();
        let label = bundle.classes[best];
        drop(guard);

        let elapsed = start.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Some(Prediction {
            label,
            probabilities,
            inference_time_us: elapsed,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let metadata = self.metadata();
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: metadata.is_some(),
            model_type: metadata.as_ref().map(|m| m.model_type.clone()),
            model_path: metadata.map(|m| m.model_path),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}

impl Default for ClassifierEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_bundle(bundle: &ModelBundle) -> Result<(), ClassifierError> {
    let classes = bundle.classes.len();
    if classes == 0 {
        return Err(ClassifierError("Bundle declares no classes".to_string()));
    }
    if bundle.features.len() != FEATURE_COUNT
        || bundle.features.iter().zip(FEATURE_LAYOUT.iter()).any(|(a, b)| a != b)
    {
        return Err(ClassifierError(format!(
            "Bundle feature layout does not match expected {FEATURE_LAYOUT:?}"
        )));
    }
    if bundle.scaler.mean.len() != FEATURE_COUNT || bundle.scaler.std.len() != FEATURE_COUNT {
        return Err(ClassifierError("Scaler dimensions do not match feature count".to_string()));
    }
    if bundle.weights.len() != classes || bundle.bias.len() != classes {
        return Err(ClassifierError("Weight/bias rows do not match class count".to_string()));
    }
    if bundle.weights.iter().any(|row| row.len() != FEATURE_COUNT) {
        return Err(ClassifierError("Weight row length does not match feature count".to_string()));
    }
    Ok(())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

// ============================================================================
// FEATURE ALIGNMENT
// ============================================================================

/// Build the aligned feature vector for a reading. Features the reading does
/// not carry (flight hours on the live path) are zeroed, exactly as the
/// training-time alignment does.
pub fn features_from_reading(reading: &SensorReading, flight_hours: Option<f64>) -> [f64; FEATURE_COUNT] {
    features_from_parts(
        flight_hours,
        Some(reading.throttle),
        Some(reading.rpm),
        Some(reading.fuel_flow),
        Some(reading.egt),
        Some(reading.oil_temp),
        Some(reading.oil_pressure),
        Some(reading.vibration),
        Some(reading.phase),
    )
}

/// Build the aligned feature vector from optional parts; anything missing is
/// aligned to zero.
#[allow(clippy::too_many_arguments)]
pub fn features_from_parts(
    flight_hours: Option<f64>,
    throttle: Option<f64>,
    rpm: Option<f64>,
    fuel_flow: Option<f64>,
    egt: Option<f64>,
    oil_temp: Option<f64>,
    oil_pressure: Option<f64>,
    vibration: Option<f64>,
    phase: Option<Phase>,
) -> [f64; FEATURE_COUNT] {
    let mut features = [0.0f64; FEATURE_COUNT];
    features[0] = flight_hours.unwrap_or(0.0);
    features[1] = throttle.unwrap_or(0.0);
    features[2] = rpm.unwrap_or(0.0);
    features[3] = fuel_flow.unwrap_or(0.0);
    features[4] = egt.unwrap_or(0.0);
    features[5] = oil_temp.unwrap_or(0.0);
    features[6] = oil_pressure.unwrap_or(0.0);
    features[7] = vibration.unwrap_or(0.0);
    if let Some(phase) = phase {
        let idx = match phase {
            Phase::Cruise => 8,
            Phase::Descent => 9,
            Phase::Idle => 10,
            Phase::Takeoff => 11,
        };
        features[idx] = 1.0;
    }
    features
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::toy_bundle;

    #[test]
    fn test_predict_probabilities_sum_to_one() {
        let engine = ClassifierEngine::new();
        engine.install(toy_bundle(), "<test>").unwrap();

        let mut features = [0.0; FEATURE_COUNT];
        features[7] = 3.0;
        let prediction = engine.predict(&features).unwrap();
        let total: f64 = prediction.probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(prediction.label, Health::Critical);
    }

    #[test]
    fn test_predict_low_vibration_is_normal() {
        let engine = ClassifierEngine::new();
        engine.install(toy_bundle(), "<test>").unwrap();

        let mut features = [0.0; FEATURE_COUNT];
        features[7] = -3.0;
        let prediction = engine.predict(&features).unwrap();
        assert_eq!(prediction.label, Health::Normal);
    }

    #[test]
    fn test_predict_without_model_is_none() {
        let engine = ClassifierEngine::new();
        assert!(engine.predict(&[0.0; FEATURE_COUNT]).is_none());
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_install_rejects_bad_dimensions() {
        let engine = ClassifierEngine::new();
        let mut bundle = toy_bundle();
        bundle.weights[0].pop();
        assert!(engine.install(bundle, "<test>").is_err());

        let mut bundle = toy_bundle();
        bundle.features[0] = "NotAFeature".to_string();
        assert!(engine.install(bundle, "<test>").is_err());
    }

    #[test]
    fn test_feature_alignment_zeroes_missing() {
        let features = features_from_parts(
            None,
            Some(0.7),
            None,
            None,
            None,
            None,
            None,
            None,
            Some(Phase::Takeoff),
        );
        assert_eq!(features[0], 0.0);
        assert_eq!(features[1], 0.7);
        assert_eq!(features[2], 0.0);
        assert_eq!(features[11], 1.0);
        assert_eq!(features[8], 0.0);
    }

    #[test]
    fn test_status_tracks_inferences() {
        let engine = ClassifierEngine::new();
        engine.install(toy_bundle(), "<test>").unwrap();
        let before = engine.status();
        assert_eq!(before.inference_count, 0);
        engine.predict(&[0.0; FEATURE_COUNT]).unwrap();
        let after = engine.status();
        assert_eq!(after.inference_count, 1);
        assert!(after.model_loaded);
        assert_eq!(after.model_type.as_deref(), Some("logreg"));
    }
}
