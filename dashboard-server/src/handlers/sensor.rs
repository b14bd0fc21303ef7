//! Live sensor sampling + inference

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;

use aeropulse_sim::{GenerationMode, Health, SensorReading};

use crate::alerts::AlertPayload;
use crate::classifier;
use crate::middleware::auth::UserContext;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct SensorLatestResponse {
    pub sample: SensorReading,
    pub prediction: Option<Health>,
    pub probabilities: Option<BTreeMap<String, f64>>,
}

/// Generate one live sample, classify it, and alert on anomalies.
///
/// The latent health/severity drawn during generation never leaves this
/// handler; callers only see the sensor reading and the classifier's verdict.
pub async fn latest(
    State(state): State<AppState>,
    user: Option<UserContext>,
) -> AppResult<Json<SensorLatestResponse>> {
    let sample = state
        .generator
        .lock()
        .generate(&state.config.aircraft_id, GenerationMode::Live);
    let reading = sample.reading;

    let features = classifier::features_from_reading(&reading, None);
    let prediction = state.classifier.predict(&features);

    if let Some(p) = &prediction {
        if p.label != Health::Normal {
            let payload = AlertPayload::new(
                p.label,
                p.probabilities.clone(),
                reading.clone(),
                user.map(|u| u.username),
            );
            let notifier = state.alerts.clone();
            // Fire and forget; alert failure never fails the request.
            tokio::spawn(async move {
                notifier.notify(&payload).await;
            });
        }
    }

    let (label, probabilities) = match prediction {
        Some(p) => (Some(p.label), Some(p.probabilities)),
        None => (None, None),
    };

    Ok(Json(SensorLatestResponse {
        sample: reading,
        prediction: label,
        probabilities,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_latest_without_model_returns_sample_only() {
        let state = test_state();
        let Json(resp) = latest(State(state), None).await.unwrap();
        assert!(resp.sample.is_finite());
        assert_eq!(resp.sample.aircraft_id, "HAL-HJT-01");
        assert!(resp.prediction.is_none());
        assert!(resp.probabilities.is_none());
    }

    #[tokio::test]
    async fn test_latest_with_model_attaches_prediction() {
        let state = test_state();
        state
            .classifier
            .install(crate::test_support::toy_bundle(), "<test>")
            .unwrap();
        let Json(resp) = latest(State(state), None).await.unwrap();
        let probabilities = resp.probabilities.unwrap();
        let total: f64 = probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(resp.prediction.is_some());
    }
}
