//! Crop Advisor Platform - Backend
//!
//! Recommends the crop best suited to a farmer's soil and weather conditions
//! and returns cultivation guidance alongside the prediction.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod ml;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{MailClient, WeatherClient};
use ml::ModelBundle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub models: Arc<ModelBundle>,
    pub weather: WeatherClient,
    pub mail: MailClient,
}

impl AppState {
    /// Wire up clients from configuration
    pub fn new(db: sqlx::PgPool, config: Config, models: ModelBundle) -> Self {
        Self {
            db,
            weather: WeatherClient::new(&config.weather),
            mail: MailClient::new(&config.mail),
            models: Arc::new(models),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisor API v1.0"
}
