//! AeroPulse Dashboard Backend
//!
//! Login-gated backend for the predictive maintenance demo: serves live
//! synthetic engine telemetry, classifies each reading with an externally
//! trained model bundle, and raises webhook alerts on anomalies.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  AEROPULSE DASHBOARD                     │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌─────────┐  ┌──────────┐  ┌────────────┐  ┌─────────┐ │
//! │  │  API    │  │  Auth    │  │ Classifier │  │  Alert  │ │
//! │  │ (Axum)  │  │  (JWT)   │  │  (bundle)  │  │ webhook │ │
//! │  └────┬────┘  └────┬─────┘  └─────┬──────┘  └────┬────┘ │
//! │       └────────────┼──────────────┘               │      │
//! │                    ▼                              │      │
//! │          ┌──────────────────┐                     │      │
//! │          │ aeropulse-sim    │                     ▼      │
//! │          │ (live generator) │              Slack/Discord │
//! │          └──────────────────┘                            │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod alerts;
mod classifier;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
#[cfg(test)]
mod test_support;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aeropulse_sim::SampleGenerator;
use classifier::ClassifierEngine;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aeropulse_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("AeroPulse dashboard starting...");

    // Open user store
    let conn = db::open(&config.database_path).expect("Failed to open user store");

    // Load the classifier bundle if present; its absence is tolerated.
    let classifier = Arc::new(ClassifierEngine::new());
    if let Err(e) = classifier.load_from_file(&config.model_path) {
        tracing::warn!("{e}; prediction endpoints will report model-not-loaded");
    }

    // Live sample generator behind a mutex (single shared random source)
    let generator = match config.generator_seed {
        Some(seed) => SampleGenerator::seeded(seed),
        None => SampleGenerator::from_entropy(),
    };

    let alerts = alerts::AlertNotifier::from_config(&config);
    if !alerts.is_configured() {
        tracing::info!("ALERT_WEBHOOK_URL not set; anomaly alerts disabled");
    }

    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        generator: Arc::new(Mutex::new(generator)),
        classifier,
        alerts,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<rusqlite::Connection>>,
    pub config: config::Config,
    pub generator: Arc<Mutex<SampleGenerator>>,
    pub classifier: Arc<ClassifierEngine>,
    pub alerts: alerts::AlertNotifier,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    // Prediction routes; ALLOW_ANON_PREDICT drops the auth requirement for
    // local/dev testing, exactly these two routes
    let prediction_routes = Router::new()
        .route("/api/v1/sensor/latest", get(handlers::sensor::latest))
        .route("/api/v1/predict", post(handlers::predict::predict));
    let prediction_routes = if state.config.allow_anon_predict {
        prediction_routes
    } else {
        prediction_routes.layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth,
        ))
    };

    // Session routes (user JWT auth)
    let session_routes = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/model/status", get(handlers::model::status))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(prediction_routes)
        .merge(session_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
