//! Shared fixtures for handler tests

use parking_lot::Mutex;
use std::sync::Arc;

use aeropulse_sim::{Health, SampleGenerator};

use crate::alerts::AlertNotifier;
use crate::classifier::{ClassifierEngine, ModelBundle, ScalerParams, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::config::Config;
use crate::{db, AppState};

/// App state over an in-memory user store, a seeded generator, no model and
/// no alert webhook.
pub fn test_state() -> AppState {
    let config = Config {
        port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        database_path: ":memory:".to_string(),
        model_path: "<none>".to_string(),
        alert_webhook_url: None,
        allow_anon_predict: true,
        aircraft_id: "HAL-HJT-01".to_string(),
        generator_seed: Some(42),
        environment: "test".to_string(),
    };
    let alerts = AlertNotifier::from_config(&config);
    AppState {
        db: Arc::new(Mutex::new(db::open_in_memory().unwrap())),
        config,
        generator: Arc::new(Mutex::new(SampleGenerator::seeded(42))),
        classifier: Arc::new(ClassifierEngine::new()),
        alerts,
    }
}

/// A bundle whose weights only reward vibration: high vibration classifies
/// as CRITICAL, low as NORMAL.
pub fn toy_bundle() -> ModelBundle {
    let vib = 7; // Vibration index in the layout
    let mut w_normal = vec![0.0; FEATURE_COUNT];
    let mut w_warning = vec![0.0; FEATURE_COUNT];
    let mut w_critical = vec![0.0; FEATURE_COUNT];
    w_normal[vib] = -2.0;
    w_warning[vib] = 0.5;
    w_critical[vib] = 2.0;
    ModelBundle {
        model_type: "logreg".to_string(),
        classes: vec![Health::Normal, Health::Warning, Health::Critical],
        features: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        scaler: ScalerParams {
            mean: vec![0.0; FEATURE_COUNT],
            std: vec![1.0; FEATURE_COUNT],
        },
        weights: vec![w_normal, w_warning, w_critical],
        bias: vec![0.0; 3],
    }
}
