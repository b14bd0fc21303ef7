//! Caller-supplied prediction

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use aeropulse_sim::{Health, Phase};

use crate::classifier;
use crate::{AppError, AppResult, AppState};

/// A caller-supplied reading. Every field is optional; anything missing is
/// aligned to zero before inference, matching the training-time alignment.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "Flight_Hours")]
    pub flight_hours: Option<f64>,
    #[serde(rename = "Phase")]
    pub phase: Option<Phase>,
    #[serde(rename = "Throttle")]
    pub throttle: Option<f64>,
    #[serde(rename = "RPM")]
    pub rpm: Option<f64>,
    #[serde(rename = "FuelFlow")]
    pub fuel_flow: Option<f64>,
    #[serde(rename = "EGT")]
    pub egt: Option<f64>,
    #[serde(rename = "OilTemp")]
    pub oil_temp: Option<f64>,
    #[serde(rename = "OilPressure")]
    pub oil_pressure: Option<f64>,
    #[serde(rename = "Vibration")]
    pub vibration: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Health,
    pub probabilities: BTreeMap<String, f64>,
}

/// Classify a caller-supplied reading.
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    let features = classifier::features_from_parts(
        req.flight_hours,
        req.throttle,
        req.rpm,
        req.fuel_flow,
        req.egt,
        req.oil_temp,
        req.oil_pressure,
        req.vibration,
        req.phase,
    );

    let prediction = state
        .classifier
        .predict(&features)
        .ok_or(AppError::ModelNotLoaded)?;

    Ok(Json(PredictResponse {
        prediction: prediction.label,
        probabilities: prediction.probabilities,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_state, toy_bundle};

    #[tokio::test]
    async fn test_predict_without_model_errors() {
        let state = test_state();
        let result = predict(State(state), Json(PredictRequest::default())).await;
        assert!(matches!(result, Err(AppError::ModelNotLoaded)));
    }

    #[tokio::test]
    async fn test_predict_flags_high_vibration() {
        let state = test_state();
        state.classifier.install(toy_bundle(), "<test>").unwrap();

        let req = PredictRequest {
            vibration: Some(5.0),
            phase: Some(Phase::Cruise),
            ..Default::default()
        };
        let Json(resp) = predict(State(state), Json(req)).await.unwrap();
        assert_eq!(resp.prediction, Health::Critical);
        assert!(resp.probabilities["CRITICAL"] > resp.probabilities["NORMAL"]);
    }
}
