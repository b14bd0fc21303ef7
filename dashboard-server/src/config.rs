//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in hours
    pub jwt_expiration_hours: u64,

    /// Path of the SQLite user store
    pub database_path: String,

    /// Path of the classifier model bundle (JSON)
    pub model_path: String,

    /// Webhook URL for anomaly alerts (unset = alerting disabled)
    pub alert_webhook_url: Option<String>,

    /// Allow unauthenticated access to the prediction routes
    pub allow_anon_predict: bool,

    /// Aircraft identifier stamped on live samples
    pub aircraft_id: String,

    /// Optional fixed seed for the live sample generator
    pub generator_seed: Option<u64>,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "aeropulse-super-secret-key-change-in-production".to_string()),

            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),

            database_path: env::var("USERS_DB_PATH")
                .unwrap_or_else(|_| "aeropulse_users.db".to_string()),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "savedmodels/engine_health_model.json".to_string()),

            alert_webhook_url: env::var("ALERT_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),

            allow_anon_predict: env::var("ALLOW_ANON_PREDICT")
                .map(|s| s.to_lowercase() == "true" || s == "1")
                .unwrap_or(false),

            aircraft_id: env::var("LIVE_AIRCRAFT_ID")
                .unwrap_or_else(|_| aeropulse_sim::DEFAULT_AIRCRAFT_ID.to_string()),

            generator_seed: env::var("GENERATOR_SEED").ok().and_then(|s| s.parse().ok()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
