//! Anomaly alert dispatch
//!
//! Sends a JSON payload to a configured webhook when the classifier flags a
//! non-NORMAL reading. Alert failure is logged and swallowed; it never fails
//! the request that triggered it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use aeropulse_sim::{Health, SensorReading};

use crate::config::Config;

/// Payload posted to the alert webhook.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload {
    pub title: String,
    pub aircraft_id: String,
    pub prediction: Health,
    pub probabilities: BTreeMap<String, f64>,
    pub sample: SensorReading,
    /// Username of the session that observed the anomaly, when known.
    pub triggered_by: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AlertPayload {
    pub fn new(
        prediction: Health,
        probabilities: BTreeMap<String, f64>,
        sample: SensorReading,
        triggered_by: Option<String>,
    ) -> Self {
        Self {
            title: format!("Engine Alert: {prediction} detected"),
            aircraft_id: sample.aircraft_id.clone(),
            prediction,
            probabilities,
            sample,
            triggered_by,
            timestamp: Utc::now(),
        }
    }
}

/// Webhook alert sender.
#[derive(Clone)]
pub struct AlertNotifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl AlertNotifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            webhook_url: config.alert_webhook_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Post the payload to the configured webhook. Returns whether the alert
    /// was delivered.
    pub async fn notify(&self, payload: &AlertPayload) -> bool {
        let Some(url) = &self.webhook_url else {
            tracing::debug!("Alert webhook not configured; skipping alert");
            return false;
        };

        match self.client.post(url).json(payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(
                    "Alert sent for {} ({})",
                    payload.aircraft_id,
                    payload.prediction
                );
                true
            }
            Ok(resp) => {
                tracing::error!("Alert webhook returned {}", resp.status());
                false
            }
            Err(e) => {
                tracing::error!("Failed to send alert: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeropulse_sim::{GenerationMode, SampleGenerator};

    fn sample_payload() -> AlertPayload {
        let mut generator = SampleGenerator::seeded(1);
        let sample = generator.generate("HAL-HJT-01", GenerationMode::Live);
        AlertPayload::new(
            Health::Critical,
            BTreeMap::from([("CRITICAL".to_string(), 0.9)]),
            sample.reading,
            Some("pilot".to_string()),
        )
    }

    #[tokio::test]
    async fn test_notify_without_webhook_is_noop() {
        let notifier = AlertNotifier {
            webhook_url: None,
            client: reqwest::Client::new(),
        };
        assert!(!notifier.is_configured());
        assert!(!notifier.notify(&sample_payload()).await);
    }

    #[test]
    fn test_payload_title_names_prediction() {
        let payload = sample_payload();
        assert_eq!(payload.title, "Engine Alert: CRITICAL detected");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["prediction"], "CRITICAL");
        assert_eq!(json["sample"]["Aircraft_ID"], "HAL-HJT-01");
    }
}
